//! Core data model for BookPath
//!
//! This crate defines the types shared by every other layer:
//! - Node / Edge / Position: the elements of a book graph
//! - GraphSnapshot: the unit of persistence and the unit of truth
//! - Identity: who is acting (authenticated user or the fallback account)
//! - NodeChange / EdgeChange: structural edits coming from the renderer
//! - EditOutcome / Noop: what a user gesture did (or why it was ignored)
//!
//! Nothing here performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod change;
pub mod identity;
pub mod outcome;
pub mod snapshot;
pub mod types;

// Re-exports
pub use change::{Connection, EdgeChange, NodeChange, StructuralChange};
pub use identity::{Identity, IdentityId, IdentityKind, UserProfile};
pub use outcome::{EditOutcome, Noop};
pub use snapshot::GraphSnapshot;
pub use types::{Edge, Node, NodeData, Position, MAX_NODE_ID};
