//! Sharded in-memory document store
//!
//! Stands in for the remote tree service in tests and offline runs.
//!
//! # Design
//!
//! - DashMap: sharded by identity, lock-free reads
//! - Per-identity shard: the current document plus its write version
//! - Fault injection: loads and saves can be made to fail, individual
//!   identities can be denied access, and saves can be delayed to
//!   reproduce completion-order races

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bookpath_core::IdentityId;
use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{RemoteResult, RemoteStoreError};
use crate::tree::DocumentStore;

/// Per-identity shard holding one document.
#[derive(Debug, Clone)]
pub struct Shard {
    /// Current document.
    pub document: Value,
    /// Global version at which it was written.
    pub version: u64,
}

/// In-memory [`DocumentStore`] sharded by identity.
///
/// # Thread Safety
///
/// All operations are thread-safe; writes only lock the target identity's
/// shard, so different identities never contend.
#[derive(Debug, Default)]
pub struct ShardedDocumentStore {
    shards: DashMap<IdentityId, Shard>,
    version: AtomicU64,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    denied: DashSet<IdentityId>,
    save_delays: Mutex<VecDeque<Duration>>,
    saves: AtomicU64,
}

impl ShardedDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads fail with `Unavailable`.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::Release);
    }

    /// Make saves fail with `Unavailable`.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::Release);
    }

    /// Refuse every load and save for `identity` with `PermissionDenied`,
    /// as security rules rejecting the caller would.
    pub fn deny(&self, identity: IdentityId) {
        self.denied.insert(identity);
    }

    /// Lift a previous [`deny`](Self::deny).
    pub fn allow(&self, identity: &IdentityId) {
        self.denied.remove(identity);
    }

    /// Delay the next not-yet-started save by `delay`. Delays queue up and
    /// are consumed one per save, in call order.
    pub fn push_save_delay(&self, delay: Duration) {
        self.save_delays.lock().push_back(delay);
    }

    /// Put a document directly, bypassing fault injection.
    pub fn insert(&self, identity: IdentityId, document: Value) {
        let version = self.next_version();
        self.shards.insert(identity, Shard { document, version });
    }

    /// Current document for `identity`.
    pub fn document(&self, identity: &IdentityId) -> Option<Value> {
        self.shards.get(identity).map(|s| s.document.clone())
    }

    /// Version of the current document for `identity`.
    pub fn version_of(&self, identity: &IdentityId) -> Option<u64> {
        self.shards.get(identity).map(|s| s.version)
    }

    /// Number of identities with a document.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Acquire)
    }

    #[inline]
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn check_access(&self, identity: &IdentityId) -> RemoteResult<()> {
        if self.denied.contains(identity) {
            return Err(RemoteStoreError::PermissionDenied {
                identity: identity.to_string(),
            });
        }
        Ok(())
    }

    fn unavailable() -> RemoteStoreError {
        RemoteStoreError::Unavailable {
            reason: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl DocumentStore for ShardedDocumentStore {
    async fn load(&self, identity: &IdentityId) -> RemoteResult<Option<Value>> {
        if self.fail_loads.load(Ordering::Acquire) {
            return Err(Self::unavailable());
        }
        self.check_access(identity)?;
        Ok(self.document(identity))
    }

    async fn save(&self, identity: &IdentityId, document: Value) -> RemoteResult<()> {
        let delay = self.save_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_saves.load(Ordering::Acquire) {
            return Err(Self::unavailable());
        }
        self.check_access(identity)?;
        // Version is taken at completion time: last completed write wins.
        let version = self.next_version();
        self.shards
            .insert(identity.clone(), Shard { document, version });
        self.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
