//! Renderer-originated structural edits.
//!
//! Dragging, deleting and hand-drawn connections arrive as
//! [`StructuralChange`] batches. How strictly they are checked depends on
//! the configured [`StructuralPolicy`]:
//!
//! | Change        | Permissive          | Enforce                                   |
//! |---------------|---------------------|-------------------------------------------|
//! | node moved    | applied             | applied                                   |
//! | node removed  | node only           | node and every edge touching it           |
//! | node added    | applied             | rejected on duplicate id or label         |
//! | edge removed  | applied             | applied                                   |
//! | edge added    | applied             | rejected if an endpoint is missing        |
//!
//! Under both policies an added node raises the id counter past its id, and
//! removing the selected node clears the selection.

use bookpath_core::{Edge, EdgeChange, Node, NodeChange, StructuralChange};

use crate::config::StructuralPolicy;
use crate::controller::GraphController;

impl GraphController {
    /// Apply a batch of renderer edits. Returns how many changes were
    /// applied; the stores are synchronized if any were.
    pub fn apply_structural_change(&mut self, change: StructuralChange) -> usize {
        let policy = self.ctx.config().structural_policy;
        let applied = match change {
            StructuralChange::Nodes(changes) => changes
                .into_iter()
                .map(|c| self.apply_node_change(c, policy))
                .filter(|applied| *applied)
                .count(),
            StructuralChange::Edges(changes) => changes
                .into_iter()
                .map(|c| self.apply_edge_change(c, policy))
                .filter(|applied| *applied)
                .count(),
            StructuralChange::Connect(connection) => {
                usize::from(self.add_edge(connection.into_edge(), policy))
            }
        };
        if applied > 0 {
            self.sync();
        }
        applied
    }

    fn apply_node_change(&mut self, change: NodeChange, policy: StructuralPolicy) -> bool {
        match change {
            NodeChange::Position { id, position } => {
                match self.snapshot.nodes.iter_mut().find(|n| n.id == id) {
                    Some(node) => {
                        node.position = position;
                        true
                    }
                    None => false,
                }
            }
            NodeChange::Remove { id } => self.remove_node(&id, policy),
            NodeChange::Add { node } => self.add_node(node, policy),
        }
    }

    fn apply_edge_change(&mut self, change: EdgeChange, policy: StructuralPolicy) -> bool {
        match change {
            EdgeChange::Remove { id } => {
                let before = self.snapshot.edges.len();
                self.snapshot.edges.retain(|e| e.id != id);
                self.snapshot.edges.len() != before
            }
            EdgeChange::Add { edge } => self.add_edge(edge, policy),
        }
    }

    fn remove_node(&mut self, id: &str, policy: StructuralPolicy) -> bool {
        let before = self.snapshot.nodes.len();
        self.snapshot.nodes.retain(|n| n.id != id);
        if self.snapshot.nodes.len() == before {
            return false;
        }
        if policy == StructuralPolicy::Enforce {
            self.snapshot.edges.retain(|e| !e.touches(id));
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        true
    }

    fn add_node(&mut self, node: Node, policy: StructuralPolicy) -> bool {
        if policy == StructuralPolicy::Enforce {
            let clash = self.snapshot.contains_node(&node.id)
                || self.snapshot.find_by_label(node.label()).is_some();
            if clash {
                tracing::debug!(
                    target: "bookpath::sync",
                    node_id = %node.id,
                    label = node.label(),
                    "Rejected node add: id or label already present"
                );
                return false;
            }
        }
        self.snapshot.nodes.push(node);
        self.snapshot.restore_next_id();
        true
    }

    fn add_edge(&mut self, edge: Edge, policy: StructuralPolicy) -> bool {
        if policy == StructuralPolicy::Enforce
            && !(self.snapshot.contains_node(&edge.source) && self.snapshot.contains_node(&edge.target))
        {
            tracing::debug!(
                target: "bookpath::sync",
                edge_id = %edge.id,
                "Rejected edge add: endpoint missing"
            );
            return false;
        }
        self.snapshot.edges.push(edge);
        true
    }
}
