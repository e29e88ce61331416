//! Error types for the session engine.

use std::path::PathBuf;

use bookpath_storage::LocalStoreError;
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// Persistence failures are not in here: they are logged and absorbed where
/// they happen. Only conditions the caller has to react to are returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A destructive operation was attempted without a resolved identity.
    #[error("an identity is required for this operation")]
    IdentityRequired,

    /// The session was opened outside a Tokio runtime.
    #[error("no async runtime available: {reason}")]
    NoRuntime {
        /// What went wrong.
        reason: String,
    },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The local mirror could not be opened.
    #[error(transparent)]
    Local(#[from] LocalStoreError),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read config file '{}': {source}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML was malformed or had wrong value types.
    #[error("invalid configuration: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
