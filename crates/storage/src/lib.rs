//! Persistence adapters for BookPath
//!
//! Two independent stores hold a copy of the graph snapshot:
//! - Local mirror: synchronous key-value cache, four entries per profile
//! - Tree store: asynchronous per-identity document store
//!
//! Both are best-effort from the controller's point of view. Reads never
//! fail hard on bad content: the mirror falls back to defaults and the tree
//! store coerces whatever document shape it finds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod mirror;
pub mod mirror_backends;
pub mod sharded;
pub mod tree;

// Re-exports
pub use error::{LoadError, LocalStoreError, RemoteStoreError};
pub use mirror::{LocalMirror, LocalMirrorStore, StorageKeys};
pub use mirror_backends::{FileMirrorStore, MemoryMirrorStore};
pub use sharded::ShardedDocumentStore;
pub use tree::{coerce_document, DocumentStore, TreeStore};
