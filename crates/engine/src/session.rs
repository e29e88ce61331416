//! Session orchestration.
//!
//! Wires the identity resolver, the stores and the controller together, and
//! reacts to identity transitions by loading the new identity's snapshot.
//!
//! ## Loading on identity change
//!
//! | Remote result            | Authenticated                  | Fallback          |
//! |--------------------------|--------------------------------|-------------------|
//! | document found           | adopt it                       | adopt it          |
//! | no document              | save empty snapshot, adopt it  | adopt empty       |
//! | load failed              | notice, adopt local mirror     | same              |
//!
//! The local mirror is not keyed by identity. After a failed load it may
//! still hold the previous identity's graph, and the next edit saves that
//! graph over the new identity's remote tree.

use std::sync::Arc;

use bookpath_core::{GraphSnapshot, Identity};
use bookpath_storage::{
    DocumentStore, FileMirrorStore, LocalMirror, LocalMirrorStore, MemoryMirrorStore, TreeStore,
};
use tokio::runtime::Handle;

use crate::config::BookPathConfig;
use crate::context::SessionContext;
use crate::controller::GraphController;
use crate::error::{Result, SessionError};
use crate::identity::{AuthEvent, IdentityResolver};
use crate::presenter::{Notice, Presenter};
use crate::writer::RemoteWriter;

/// A running editor session.
pub struct Session {
    ctx: Arc<SessionContext>,
    resolver: IdentityResolver,
    tree: TreeStore,
    presenter: Arc<dyn Presenter>,
    controller: GraphController,
}

impl Session {
    /// Assemble a session from explicit parts.
    pub fn new(
        ctx: Arc<SessionContext>,
        mirror_store: Arc<dyn LocalMirrorStore>,
        documents: Arc<dyn DocumentStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let mirror = LocalMirror::new(mirror_store, ctx.config().storage_keys.clone());
        let tree = TreeStore::new(documents);
        let writer = RemoteWriter::new(ctx.clone(), tree.clone());
        let controller = GraphController::new(ctx.clone(), mirror, writer, presenter.clone());
        Self {
            resolver: IdentityResolver::new(ctx.clone()),
            ctx,
            tree,
            presenter,
            controller,
        }
    }

    /// Open a session on the current Tokio runtime.
    ///
    /// The local mirror is file-backed when `mirror_dir` is configured and
    /// in-memory otherwise.
    pub fn open(
        config: BookPathConfig,
        documents: Arc<dyn DocumentStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| SessionError::NoRuntime {
            reason: e.to_string(),
        })?;
        let mirror_store: Arc<dyn LocalMirrorStore> = match &config.mirror_dir {
            Some(dir) => Arc::new(FileMirrorStore::open(dir)?),
            None => Arc::new(MemoryMirrorStore::new()),
        };
        tracing::info!(
            target: "bookpath::sync",
            mirror_dir = ?config.mirror_dir,
            write_policy = ?config.write_policy,
            "Session opened"
        );
        let ctx = SessionContext::init(config, runtime);
        Ok(Self::new(ctx, mirror_store, documents, presenter))
    }

    /// Apply an identity-provider event, then load and adopt the snapshot
    /// of the identity now acting.
    pub async fn handle_auth_event(&mut self, event: AuthEvent) -> Identity {
        let identity = self.resolver.apply(event);
        let snapshot = self.load_for(&identity).await;
        self.controller.adopt(snapshot);
        identity
    }

    async fn load_for(&self, identity: &Identity) -> GraphSnapshot {
        match self.tree.load(&identity.id).await {
            Ok(Some(snapshot)) => {
                tracing::info!(
                    target: "bookpath::remote",
                    identity = %identity.id,
                    nodes = snapshot.node_count(),
                    "Tree loaded"
                );
                snapshot
            }
            Ok(None) if identity.is_authenticated() => {
                let empty = GraphSnapshot::empty();
                if let Err(e) = self.tree.save(&identity.id, &empty).await {
                    tracing::warn!(
                        target: "bookpath::remote",
                        identity = %identity.id,
                        error = %e,
                        "Could not create tree"
                    );
                } else {
                    tracing::info!(target: "bookpath::remote", identity = %identity.id, "Tree created");
                }
                empty
            }
            Ok(None) => GraphSnapshot::empty(),
            Err(e) => {
                tracing::warn!(
                    target: "bookpath::remote",
                    identity = %identity.id,
                    error = %e,
                    "Tree load failed, using local mirror"
                );
                self.presenter.notify(Notice::LoadFailed {
                    identity: identity.id.clone(),
                    reason: e.to_string(),
                });
                self.controller.mirror().read_snapshot()
            }
        }
    }

    /// Graph controller.
    pub fn controller(&self) -> &GraphController {
        &self.controller
    }

    /// Graph controller, for edits.
    pub fn controller_mut(&mut self) -> &mut GraphController {
        &mut self.controller
    }

    /// Identity now acting, if resolved.
    pub fn identity(&self) -> Option<Identity> {
        self.ctx.resolved_identity()
    }

    /// Shared session context.
    pub fn ctx(&self) -> &Arc<SessionContext> {
        &self.ctx
    }

    /// Wait for pending remote writes.
    pub async fn flush(&self) {
        self.controller.flush().await;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.ctx.identity())
            .field("generation", &self.ctx.generation())
            .field("controller", &self.controller)
            .finish()
    }
}
