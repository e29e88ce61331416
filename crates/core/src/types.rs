//! Node and edge types for a book graph.
//!
//! The serialized shapes match the documents already written by the web
//! client: a node carries its title under `data.label`, edges use camelCase
//! handle names.

use serde::{Deserialize, Serialize};

/// A 2D placement for a node.
/// Largest id the counter hands out: 2^53, the last integer every JSON
/// reader represents exactly.
pub const MAX_NODE_ID: u64 = 1 << 53;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Initial placement for a node created from counter value `seq`.
    ///
    /// Not physically meaningful; it only spreads new nodes out so they do
    /// not stack on top of each other.
    pub fn for_seq(seq: u64) -> Self {
        Self {
            x: 100.0 * seq as f64,
            y: 100.0 + (seq % 5) as f64 * 80.0,
        }
    }
}

/// User-visible payload of a node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeData {
    /// The book title shown on the node.
    pub label: String,
}

/// A node in the book graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Stringified counter value assigned at creation.
    pub id: String,
    /// Current placement.
    #[serde(default)]
    pub position: Position,
    /// Label payload.
    pub data: NodeData,
    /// Presentation-only styling, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

impl Node {
    /// Create a node for counter value `seq` with the given label.
    pub fn new(seq: u64, label: impl Into<String>) -> Self {
        Self {
            id: seq.to_string(),
            position: Position::for_seq(seq),
            data: NodeData {
                label: label.into(),
            },
            style: None,
        }
    }

    /// The node's title.
    pub fn label(&self) -> &str {
        &self.data.label
    }

    /// The id as an integer, when it is one no larger than
    /// [`MAX_NODE_ID`]. Larger integers are treated like any other
    /// non-numeric id.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok().filter(|n| *n <= MAX_NODE_ID)
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// `"{source}-{target}"`.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Handle on the source node the connection was drawn from.
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_handle: Option<String>,
    /// Handle on the target node the connection was drawn to.
    #[serde(
        rename = "targetHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_handle: Option<String>,
}

impl Edge {
    /// Create an edge from `source` to `target` with the derived id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Self::id_for(&source, &target),
            source,
            target,
            source_handle: None,
            target_handle: None,
        }
    }

    /// Edge id for an ordered pair of node ids.
    pub fn id_for(source: &str, target: &str) -> String {
        format!("{}-{}", source, target)
    }

    /// True if either endpoint is `node_id`.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
