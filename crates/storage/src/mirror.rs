//! Local mirror of the graph snapshot.
//!
//! The mirror is a plain string key-value store (a browser profile's local
//! storage, or a directory on disk). The snapshot is spread over four
//! entries so each can be read back independently:
//!
//! | Entry      | Content                     |
//! |------------|-----------------------------|
//! | nodes      | JSON array of nodes         |
//! | edges      | JSON array of edges         |
//! | next id    | integer, as a JSON number   |
//! | last save  | RFC 3339 timestamp, raw     |
//!
//! Reads never fail: missing or malformed entries yield the caller's default
//! and a warning.

use std::sync::Arc;

use bookpath_core::{Edge, GraphSnapshot, Node};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{LocalResult, LocalStoreError};

/// Synchronous string key-value storage backing the mirror.
pub trait LocalMirrorStore: Send + Sync {
    /// Raw value for `key`, or None if absent.
    fn get(&self, key: &str) -> LocalResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> LocalResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> LocalResult<()>;
}

/// Names of the four mirror entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Entry holding the node list.
    pub nodes: String,
    /// Entry holding the edge list.
    pub edges: String,
    /// Entry holding the id counter.
    pub next_id: String,
    /// Entry holding the last successful save time.
    pub last_save: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            nodes: "lined-nodes-v1".to_string(),
            edges: "lined-edges-v1".to_string(),
            next_id: "lined-next-id-v1".to_string(),
            last_save: "lined-last-save-v1".to_string(),
        }
    }
}

impl StorageKeys {
    /// All four keys.
    pub fn all(&self) -> [&str; 4] {
        [&self.nodes, &self.edges, &self.next_id, &self.last_save]
    }
}

/// Typed snapshot access over any [`LocalMirrorStore`].
///
/// Clone is cheap (just an Arc clone).
#[derive(Clone)]
pub struct LocalMirror {
    store: Arc<dyn LocalMirrorStore>,
    keys: StorageKeys,
}

impl LocalMirror {
    /// Wrap a backend with the given key names.
    pub fn new(store: Arc<dyn LocalMirrorStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// The key names in use.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Decode `key` as JSON, or return `default` if absent or malformed.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(target: "bookpath::mirror", key, error = %e, "Mirror read failed");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(target: "bookpath::mirror", key, error = %e, "Mirror entry is malformed");
                default
            }
        }
    }

    /// Encode `value` as JSON under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> LocalResult<()> {
        let encoded = serde_json::to_string(value).map_err(|e| LocalStoreError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(key, &encoded)
    }

    /// Write all snapshot entries.
    ///
    /// Each entry is written independently; a failing entry does not stop
    /// the others. Returns the save time if every entry was written, in which
    /// case it is also recorded under the last-save key.
    pub fn write_snapshot(&self, snapshot: &GraphSnapshot) -> Option<DateTime<Utc>> {
        let results = [
            self.write(&self.keys.nodes, &snapshot.nodes),
            self.write(&self.keys.edges, &snapshot.edges),
            self.write(&self.keys.next_id, &snapshot.next_id),
        ];

        let mut all_ok = true;
        for result in results {
            if let Err(e) = result {
                all_ok = false;
                tracing::warn!(target: "bookpath::mirror", error = %e, "Mirror write failed");
            }
        }
        if !all_ok {
            return None;
        }

        let now = Utc::now();
        if let Err(e) = self.store.set(&self.keys.last_save, &now.to_rfc3339()) {
            tracing::warn!(target: "bookpath::mirror", error = %e, "Could not record last save time");
        }
        Some(now)
    }

    /// Reassemble a snapshot from the mirror entries.
    ///
    /// Missing entries default to empty lists and a counter of 1; the
    /// counter is then raised above any numeric node id found.
    pub fn read_snapshot(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot {
            nodes: self.read_or::<Vec<Node>>(&self.keys.nodes, Vec::new()),
            edges: self.read_or::<Vec<Edge>>(&self.keys.edges, Vec::new()),
            next_id: self.read_or(&self.keys.next_id, 1u64),
        };
        if snapshot.restore_next_id() {
            tracing::warn!(
                target: "bookpath::mirror",
                next_id = snapshot.next_id,
                "Mirror id counter was behind its nodes, raised"
            );
        }
        snapshot
    }

    /// Time of the last complete save, if recorded and parseable.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        let raw = match self.store.get(&self.keys.last_save) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(target: "bookpath::mirror", error = %e, "Mirror read failed");
                return None;
            }
        };
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(target: "bookpath::mirror", error = %e, "Last save time is malformed");
                None
            }
        }
    }

    /// Remove all four entries.
    pub fn erase(&self) {
        for key in self.keys.all() {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(target: "bookpath::mirror", key, error = %e, "Mirror remove failed");
            }
        }
    }
}
