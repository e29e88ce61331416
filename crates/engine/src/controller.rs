//! Graph state controller.
//!
//! Owns the working snapshot and the selection, applies edit gestures with
//! label deduplication, and synchronizes both stores after every mutation.
//!
//! ## Synchronization
//!
//! After each mutating operation:
//!
//! | Step | Action                                             | On failure      |
//! |------|----------------------------------------------------|-----------------|
//! | 0    | skip if the snapshot is empty and nothing adopted  | -               |
//! | 1    | write nodes, edges and counter to the local mirror | logged          |
//! | 2    | record the save time if every entry was written    | logged          |
//! | 3    | submit the snapshot to the remote writer           | logged by writer|
//!
//! The two stores are independent; partial success is normal.

use std::sync::Arc;

use bookpath_core::{EditOutcome, GraphSnapshot, Identity, Node, Noop};
use bookpath_storage::LocalMirror;
use chrono::{DateTime, Utc};

use crate::context::SessionContext;
use crate::error::{Result, SessionError};
use crate::presenter::{Notice, Presenter};
use crate::writer::RemoteWriter;

const CLEAR_PROMPT: &str = "Clear the whole graph? This cannot be undone.";

/// Result of a confirmed destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The graph was cleared.
    Cleared,
    /// The user declined; nothing changed.
    Declined,
}

/// Authoritative in-memory graph state.
pub struct GraphController {
    pub(crate) ctx: Arc<SessionContext>,
    pub(crate) snapshot: GraphSnapshot,
    pub(crate) selected: Option<String>,
    mirror: LocalMirror,
    writer: RemoteWriter,
    presenter: Arc<dyn Presenter>,
    last_saved: Option<DateTime<Utc>>,
    adopted: bool,
}

impl GraphController {
    /// Create a controller with an empty snapshot.
    pub fn new(
        ctx: Arc<SessionContext>,
        mirror: LocalMirror,
        writer: RemoteWriter,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let last_saved = mirror.last_saved();
        Self {
            ctx,
            snapshot: GraphSnapshot::empty(),
            selected: None,
            mirror,
            writer,
            presenter,
            last_saved,
            adopted: false,
        }
    }

    // ========== Edit gestures ==========

    /// Add a node with no incoming edge.
    pub fn add_root_node(&mut self, label: &str) -> EditOutcome {
        let label = label.trim();
        if label.is_empty() {
            return EditOutcome::Ignored(Noop::EmptyLabel);
        }
        if self.ctx.editing_identity().is_none() {
            return EditOutcome::Ignored(Noop::IdentityUnresolved);
        }
        if self.snapshot.find_by_label(label).is_some() {
            return EditOutcome::Ignored(Noop::DuplicateLabel);
        }

        let Some(node_id) = self.snapshot.push_node(label) else {
            return self.ids_exhausted();
        };
        self.selected = None;
        tracing::debug!(target: "bookpath::sync", node_id = %node_id, label, "Root node added");
        self.sync();
        EditOutcome::NodeAdded { node_id }
    }

    /// Connect the selected node to the node labelled `label`, creating that
    /// node first if no node carries the label. The selection is kept.
    pub fn add_connected_node(&mut self, label: &str) -> EditOutcome {
        let label = label.trim();
        if label.is_empty() {
            return EditOutcome::Ignored(Noop::EmptyLabel);
        }
        let Some(selected) = self.selected.clone() else {
            return EditOutcome::Ignored(Noop::NoSelection);
        };
        if self.ctx.editing_identity().is_none() {
            return EditOutcome::Ignored(Noop::IdentityUnresolved);
        }

        let outcome = match self.snapshot.find_by_label(label).map(|n| n.id.clone()) {
            Some(existing) => EditOutcome::EdgeAdded {
                edge_id: self.snapshot.push_edge(&selected, &existing),
            },
            None => {
                let Some(node_id) = self.snapshot.push_node(label) else {
                    return self.ids_exhausted();
                };
                let edge_id = self.snapshot.push_edge(&selected, &node_id);
                EditOutcome::NodeAndEdgeAdded { node_id, edge_id }
            }
        };
        tracing::debug!(target: "bookpath::sync", from = %selected, label, ?outcome, "Connected node");
        self.sync();
        outcome
    }

    /// Toggle the selection: selecting the selected node clears it.
    pub fn select_node(&mut self, node_id: &str) {
        if self.selected.as_deref() == Some(node_id) {
            self.selected = None;
        } else {
            self.selected = Some(node_id.to_string());
        }
    }

    /// Reset the graph to empty in memory and in both stores.
    ///
    /// Needs an editing identity and the user's confirmation. Without an
    /// identity a notice is shown and `IdentityRequired` returned; nothing
    /// is written.
    pub fn clear_all(&mut self) -> Result<ClearOutcome> {
        let Some(identity) = self.ctx.editing_identity() else {
            self.presenter.notify(Notice::IdentityRequired);
            return Err(SessionError::IdentityRequired);
        };
        if !self.presenter.confirm(CLEAR_PROMPT) {
            return Ok(ClearOutcome::Declined);
        }

        self.snapshot = GraphSnapshot::empty();
        self.selected = None;
        self.mirror.erase();
        self.last_saved = None;
        self.writer.submit(identity.id.clone(), self.snapshot.clone());
        tracing::info!(target: "bookpath::sync", identity = %identity.id, "Graph cleared");
        Ok(ClearOutcome::Cleared)
    }

    /// Replace the working snapshot with one loaded for a new identity.
    ///
    /// The local mirror is refreshed; the remote document is left alone.
    pub fn adopt(&mut self, snapshot: GraphSnapshot) {
        self.snapshot = snapshot;
        self.selected = None;
        self.adopted = true;
        if !self.snapshot.is_empty() {
            if let Some(at) = self.mirror.write_snapshot(&self.snapshot) {
                self.last_saved = Some(at);
            }
        }
        tracing::debug!(
            target: "bookpath::sync",
            nodes = self.snapshot.node_count(),
            edges = self.snapshot.edge_count(),
            next_id = self.snapshot.next_id,
            "Snapshot adopted"
        );
    }

    fn ids_exhausted(&self) -> EditOutcome {
        tracing::warn!(
            target: "bookpath::sync",
            next_id = self.snapshot.next_id,
            "Node id counter exhausted, node not added"
        );
        EditOutcome::Ignored(Noop::IdsExhausted)
    }

    // ========== Accessors ==========

    /// Working snapshot.
    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    /// Selected node id.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Node carrying `label`.
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        self.snapshot.find_by_label(label)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.snapshot.node_count()
    }

    /// Time of the last complete local save.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// True once a snapshot has been adopted.
    pub fn is_loaded(&self) -> bool {
        self.adopted
    }

    /// Local mirror in use.
    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    /// Wait for every remote write submitted so far.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    // ========== Synchronization ==========

    pub(crate) fn sync(&mut self) {
        if self.snapshot.is_empty() && !self.adopted {
            tracing::trace!(target: "bookpath::sync", "Nothing loaded yet, skipping sync");
            return;
        }

        if let Some(at) = self.mirror.write_snapshot(&self.snapshot) {
            self.last_saved = Some(at);
        }

        match self.ctx.editing_identity() {
            Some(Identity { id, .. }) => self.writer.submit(id, self.snapshot.clone()),
            None => {
                tracing::debug!(target: "bookpath::sync", "No writable identity, remote write skipped")
            }
        }
    }
}

impl std::fmt::Debug for GraphController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphController")
            .field("nodes", &self.snapshot.node_count())
            .field("edges", &self.snapshot.edge_count())
            .field("next_id", &self.snapshot.next_id)
            .field("selected", &self.selected)
            .field("adopted", &self.adopted)
            .finish()
    }
}
