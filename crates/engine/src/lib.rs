//! Session engine for BookPath
//!
//! This crate runs an editing session:
//! - SessionContext: configuration, acting identity, generation, runtime
//! - IdentityResolver: identity-provider events to identity transitions
//! - GraphController: the working snapshot, edit gestures, store sync
//! - RemoteWriter: non-blocking remote writes under a write policy
//! - Session: loads the right snapshot whenever the identity changes
//!
//! Rendering is out of scope; the engine talks to the user only through
//! the [`Presenter`] seam.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod identity;
pub mod presenter;
pub mod session;
pub mod structural;
pub mod writer;

// Re-exports
pub use config::{BookPathConfig, StructuralPolicy, WritePolicy, DEFAULT_FALLBACK_IDENTITY};
pub use context::{IdentityState, SessionContext};
pub use controller::{ClearOutcome, GraphController};
pub use error::{ConfigError, Result, SessionError};
pub use identity::{AuthEvent, IdentityResolver};
pub use presenter::{Notice, Presenter, RecordingPresenter};
pub use session::Session;
pub use writer::RemoteWriter;
