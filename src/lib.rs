//! # BookPath
//!
//! Core of a personal graph-note editor: users build a directed graph of
//! labeled book nodes, persisted per user to a local mirror and a remote
//! tree store.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use bookpath::{AuthEvent, BookPathConfig, RecordingPresenter, Session, ShardedDocumentStore};
//!
//! # async fn demo() -> bookpath::Result<()> {
//! let mut session = Session::open(
//!     BookPathConfig::default(),
//!     Arc::new(ShardedDocumentStore::new()),
//!     Arc::new(RecordingPresenter::default()),
//! )?;
//! session.handle_auth_event(AuthEvent::NoSession).await;
//!
//! let graph = session.controller_mut();
//! graph.add_root_node("Dune");
//! graph.select_node("1");
//! graph.add_connected_node("Foundation");
//! session.flush().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Layers
//!
//! | Crate              | Contents                                   |
//! |--------------------|--------------------------------------------|
//! | `bookpath-core`    | snapshot, node, edge, identity types       |
//! | `bookpath-storage` | local mirror and remote tree store         |
//! | `bookpath-engine`  | controller, identity, writer, session      |

#![warn(missing_docs)]

mod logging;

pub use logging::{init_logging, init_logging_from};

pub use bookpath_core::{
    Connection, Edge, EdgeChange, EditOutcome, GraphSnapshot, Identity, IdentityId, IdentityKind,
    Node, NodeChange, NodeData, Noop, Position, StructuralChange, UserProfile, MAX_NODE_ID,
};
pub use bookpath_engine::{
    AuthEvent, BookPathConfig, ClearOutcome, ConfigError, GraphController, IdentityResolver,
    IdentityState, Notice, Presenter, RecordingPresenter, RemoteWriter, Result, Session,
    SessionContext, SessionError, StructuralPolicy, WritePolicy, DEFAULT_FALLBACK_IDENTITY,
};
pub use bookpath_storage::{
    coerce_document, DocumentStore, FileMirrorStore, LoadError, LocalMirror, LocalMirrorStore,
    LocalStoreError, MemoryMirrorStore, RemoteStoreError, ShardedDocumentStore, StorageKeys,
    TreeStore,
};
