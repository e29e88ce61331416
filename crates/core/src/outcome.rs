//! Results of user edit gestures.

use std::fmt;

/// Why an edit gesture was silently ignored.
///
/// These are soft guards, not failures: the presentation layer may grey out
/// a button, but nothing is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noop {
    /// The label was empty after trimming.
    EmptyLabel,
    /// A root node with this label already exists.
    DuplicateLabel,
    /// Connecting requires a selected node.
    NoSelection,
    /// No identity is resolved (or the identity may not edit).
    IdentityUnresolved,
    /// The id counter is past the largest allocatable id.
    IdsExhausted,
}

impl fmt::Display for Noop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Noop::EmptyLabel => "empty label",
            Noop::DuplicateLabel => "duplicate label",
            Noop::NoSelection => "no node selected",
            Noop::IdentityUnresolved => "identity unresolved",
            Noop::IdsExhausted => "node ids exhausted",
        };
        f.write_str(s)
    }
}

/// What an add gesture did to the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// A node was created, without an edge.
    NodeAdded {
        /// New node id.
        node_id: String,
    },
    /// An edge to an already existing node was created.
    EdgeAdded {
        /// New edge id.
        edge_id: String,
    },
    /// A node and the edge leading to it were created.
    NodeAndEdgeAdded {
        /// New node id.
        node_id: String,
        /// New edge id.
        edge_id: String,
    },
    /// Nothing changed.
    Ignored(Noop),
}

impl EditOutcome {
    /// True if the snapshot changed.
    pub fn is_applied(&self) -> bool {
        !matches!(self, EditOutcome::Ignored(_))
    }
}
