//! GraphSnapshot: the complete serializable state of one book graph.

use serde::{Deserialize, Serialize};

use crate::types::{Edge, Node, MAX_NODE_ID};

fn first_id() -> u64 {
    1
}

/// A snapshot of a book graph at a point in time.
///
/// Node and edge order is insertion order and is preserved through every
/// store round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    /// Nodes in insertion order.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges in insertion order.
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Counter the next node id is taken from.
    #[serde(rename = "nextId", default = "first_id")]
    pub next_id: u64,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl GraphSnapshot {
    /// The empty snapshot: no nodes, no edges, counter at 1.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: first_id(),
        }
    }

    /// True when there are no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// First node whose label matches exactly (case-sensitive).
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label() == label)
    }

    /// Node with the given id.
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    /// True if a node with this id exists.
    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node(node_id).is_some()
    }

    /// Largest integer-valued node id, if any node id is an integer.
    pub fn max_numeric_id(&self) -> Option<u64> {
        self.nodes.iter().filter_map(Node::numeric_id).max()
    }

    /// Raise `next_id` so it is strictly greater than every numeric node id.
    ///
    /// Returns true if the counter moved.
    pub fn restore_next_id(&mut self) -> bool {
        let floor = self
            .max_numeric_id()
            .map(|max| max.saturating_add(1))
            .unwrap_or(first_id())
            .max(first_id());
        if self.next_id < floor {
            self.next_id = floor;
            true
        } else {
            false
        }
    }

    /// Allocate the next id, append a node with `label`, and return its id.
    ///
    /// Returns None, leaving the snapshot untouched, once the counter has
    /// passed [`MAX_NODE_ID`].
    pub fn push_node(&mut self, label: &str) -> Option<String> {
        if self.next_id > MAX_NODE_ID {
            return None;
        }
        let node = Node::new(self.next_id, label);
        let id = node.id.clone();
        self.nodes.push(node);
        self.next_id += 1;
        Some(id)
    }

    /// Append an edge from `source` to `target` and return its id.
    pub fn push_edge(&mut self, source: &str, target: &str) -> String {
        let edge = Edge::new(source, target);
        let id = edge.id.clone();
        self.edges.push(edge);
        id
    }

    /// True if no two nodes share a label.
    pub fn labels_are_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.nodes.iter().all(|n| seen.insert(n.label()))
    }

    /// Edges whose endpoints are not both present.
    pub fn dangling_edges(&self) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains_node(&e.source) || !self.contains_node(&e.target))
            .collect()
    }
}
