//! Structural changes emitted by the graph renderer.
//!
//! These describe free-form edits made directly on the canvas (dragging,
//! deleting, drawing a connection). They are applied as given; validation,
//! if any, is the controller's policy decision.

use serde::{Deserialize, Serialize};

use crate::types::{Edge, Node, Position};

/// A change to the node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeChange {
    /// The node was dragged to a new position.
    Position {
        /// Node id.
        id: String,
        /// New position.
        position: Position,
    },
    /// The node was deleted on the canvas.
    Remove {
        /// Node id.
        id: String,
    },
    /// A node was inserted by the renderer.
    Add {
        /// The node as the renderer built it.
        node: Node,
    },
}

/// A change to the edge list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EdgeChange {
    /// The edge was deleted on the canvas.
    Remove {
        /// Edge id.
        id: String,
    },
    /// An edge was inserted by the renderer.
    Add {
        /// The edge as the renderer built it.
        edge: Edge,
    },
}

/// A connection drawn by hand between two node handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Source handle, if the node has several.
    #[serde(rename = "sourceHandle", default)]
    pub source_handle: Option<String>,
    /// Target handle, if the node has several.
    #[serde(rename = "targetHandle", default)]
    pub target_handle: Option<String>,
}

impl Connection {
    /// Connection between two nodes without handle information.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// The edge this connection produces.
    pub fn into_edge(self) -> Edge {
        let mut edge = Edge::new(self.source, self.target);
        edge.source_handle = self.source_handle;
        edge.target_handle = self.target_handle;
        edge
    }
}

/// One batch of renderer-originated edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "changes", rename_all = "lowercase")]
pub enum StructuralChange {
    /// Node list changes.
    Nodes(Vec<NodeChange>),
    /// Edge list changes.
    Edges(Vec<EdgeChange>),
    /// A hand-drawn connection.
    Connect(Connection),
}
