//! Session configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration. Use the builder methods to adjust individual settings:
//!
//! ```ignore
//! use bookpath_engine::{BookPathConfig, WritePolicy};
//!
//! let cfg = BookPathConfig::new()
//!     .fallback_identity("shared-shelf")
//!     .write_policy(WritePolicy::LastCompleted);
//! ```

use std::path::{Path, PathBuf};

use bookpath_storage::StorageKeys;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Id used before anyone signs in.
pub const DEFAULT_FALLBACK_IDENTITY: &str = "lined-admin";

/// How remote snapshot writes are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// One task per write; whichever completes last wins.
    LastCompleted,
    /// One write at a time; a queued write is replaced by a newer one, so
    /// the last submitted snapshot wins (default).
    #[default]
    SingleFlight,
}

/// How renderer-originated structural edits are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralPolicy {
    /// Apply edits as given (default).
    #[default]
    Permissive,
    /// Reject additions that break label uniqueness or reference missing
    /// nodes, and drop a removed node's edges with it.
    Enforce,
}

/// Configuration for a BookPath session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookPathConfig {
    /// Identity used when no user is signed in.
    pub fallback_identity: String,
    /// If true, the fallback identity may view but not edit, and nothing is
    /// written to its remote document.
    pub fallback_read_only: bool,
    /// Local mirror entry names.
    pub storage_keys: StorageKeys,
    /// Remote write scheduling.
    pub write_policy: WritePolicy,
    /// Structural edit checking.
    pub structural_policy: StructuralPolicy,
    /// Directory for the file-backed mirror; in-memory if unset.
    pub mirror_dir: Option<PathBuf>,
    /// Log level read by `bookpath::init_logging_from` (error, warn, info,
    /// debug, trace).
    pub log_level: String,
}

impl Default for BookPathConfig {
    fn default() -> Self {
        Self {
            fallback_identity: DEFAULT_FALLBACK_IDENTITY.to_string(),
            fallback_read_only: false,
            storage_keys: StorageKeys::default(),
            write_policy: WritePolicy::default(),
            structural_policy: StructuralPolicy::default(),
            mirror_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl BookPathConfig {
    /// Configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Set the fallback identity id.
    pub fn fallback_identity(mut self, id: impl Into<String>) -> Self {
        self.fallback_identity = id.into();
        self
    }

    /// Make the fallback identity read-only.
    pub fn fallback_read_only(mut self, read_only: bool) -> Self {
        self.fallback_read_only = read_only;
        self
    }

    /// Set the mirror entry names.
    pub fn storage_keys(mut self, keys: StorageKeys) -> Self {
        self.storage_keys = keys;
        self
    }

    /// Set the remote write policy.
    pub fn write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Set the structural edit policy.
    pub fn structural_policy(mut self, policy: StructuralPolicy) -> Self {
        self.structural_policy = policy;
        self
    }

    /// Use a file-backed mirror under `dir`.
    pub fn mirror_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mirror_dir = Some(dir.into());
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
