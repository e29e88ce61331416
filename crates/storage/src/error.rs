//! Error types for the persistence layer.

use thiserror::Error;

/// Failure writing to or reading from the local mirror.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    /// The backing medium rejected the operation.
    #[error("local store I/O failed for key '{key}': {source}")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The value could not be serialized.
    #[error("could not encode value for key '{key}': {reason}")]
    Encode {
        /// Key being written.
        key: String,
        /// What went wrong.
        reason: String,
    },

    /// The store refuses writes (quota exceeded, private mode, ...).
    #[error("local store is not writable: {reason}")]
    Unavailable {
        /// What went wrong.
        reason: String,
    },
}

/// Failure talking to the remote document store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteStoreError {
    /// Network or service failure.
    #[error("remote store unavailable: {reason}")]
    Unavailable {
        /// What went wrong.
        reason: String,
    },

    /// The service refused the request for this identity.
    #[error("permission denied for '{identity}'")]
    PermissionDenied {
        /// Identity the request was made for.
        identity: String,
    },
}

/// Failure turning a remote document into a snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The store itself failed.
    #[error(transparent)]
    Remote(#[from] RemoteStoreError),

    /// The document is not a JSON object at all.
    #[error("tree document is not an object (found {found})")]
    NotAnObject {
        /// JSON type that was found instead.
        found: &'static str,
    },
}

/// Result alias for local mirror operations.
pub type LocalResult<T> = std::result::Result<T, LocalStoreError>;

/// Result alias for remote store operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteStoreError>;
