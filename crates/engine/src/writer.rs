//! Remote snapshot writer.
//!
//! Remote writes never block the controller: `submit` returns immediately
//! and the write happens on the session runtime. Two schedules are
//! available (see [`WritePolicy`]):
//!
//! - `LastCompleted`: every submission is its own task. Overlapping writes
//!   race and the one that completes last is what the store keeps.
//! - `SingleFlight`: a single worker drains a one-slot mailbox. A
//!   submission that has not started yet is replaced by the next one, so the
//!   store ends with the last submitted snapshot.
//!
//! Each write carries the session generation it was submitted under. A write
//! whose generation is no longer current when it is about to start is
//! dropped. A write that has already started is never cancelled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bookpath_core::{GraphSnapshot, IdentityId};
use bookpath_storage::TreeStore;
use tokio::sync::watch;

use crate::config::WritePolicy;
use crate::context::SessionContext;

#[derive(Debug, Clone)]
struct PendingWrite {
    seq: u64,
    generation: u64,
    identity: IdentityId,
    snapshot: GraphSnapshot,
}

enum Schedule {
    LastCompleted,
    SingleFlight {
        mailbox: watch::Sender<Option<PendingWrite>>,
    },
}

/// Schedules snapshot writes to the tree store.
pub struct RemoteWriter {
    ctx: Arc<SessionContext>,
    tree: TreeStore,
    schedule: Schedule,
    submitted: AtomicU64,
    // LastCompleted: number of finished writes.
    // SingleFlight: highest finished (or superseded) sequence number.
    // Either way, `done >= n` means the first n submissions are settled.
    done: Arc<watch::Sender<u64>>,
}

impl RemoteWriter {
    /// Create a writer using the policy from the session configuration.
    pub fn new(ctx: Arc<SessionContext>, tree: TreeStore) -> Self {
        let policy = ctx.config().write_policy;
        Self::with_policy(ctx, tree, policy)
    }

    /// Create a writer with an explicit policy.
    pub fn with_policy(ctx: Arc<SessionContext>, tree: TreeStore, policy: WritePolicy) -> Self {
        let (done, _) = watch::channel(0u64);
        let done = Arc::new(done);
        let schedule = match policy {
            WritePolicy::LastCompleted => Schedule::LastCompleted,
            WritePolicy::SingleFlight => {
                let (mailbox, rx) = watch::channel(None);
                ctx.runtime().spawn(single_flight_worker(
                    ctx.clone(),
                    tree.clone(),
                    rx,
                    done.clone(),
                ));
                Schedule::SingleFlight { mailbox }
            }
        };
        Self {
            ctx,
            tree,
            schedule,
            submitted: AtomicU64::new(0),
            done,
        }
    }

    /// Policy in use.
    pub fn policy(&self) -> WritePolicy {
        match self.schedule {
            Schedule::LastCompleted => WritePolicy::LastCompleted,
            Schedule::SingleFlight { .. } => WritePolicy::SingleFlight,
        }
    }

    /// Queue a write of `snapshot` under `identity`. Returns immediately.
    pub fn submit(&self, identity: IdentityId, snapshot: GraphSnapshot) {
        let write = PendingWrite {
            seq: self.submitted.fetch_add(1, Ordering::AcqRel) + 1,
            generation: self.ctx.generation(),
            identity,
            snapshot,
        };
        match &self.schedule {
            Schedule::LastCompleted => {
                let ctx = self.ctx.clone();
                let tree = self.tree.clone();
                let done = self.done.clone();
                self.ctx.runtime().spawn(async move {
                    perform(&ctx, &tree, &write).await;
                    done.send_modify(|n| *n += 1);
                });
            }
            Schedule::SingleFlight { mailbox } => {
                let replaced = mailbox.send_replace(Some(write));
                if let Some(old) = replaced {
                    tracing::trace!(target: "bookpath::sync", seq = old.seq, "Write superseded");
                }
            }
        }
    }

    /// Number of writes submitted so far.
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Acquire)
    }

    /// Wait until every write submitted before this call has settled
    /// (completed, failed, superseded or discarded).
    pub async fn flush(&self) {
        let target = self.submitted();
        let mut rx = self.done.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|done| *done >= target).await;
    }
}

async fn single_flight_worker(
    ctx: Arc<SessionContext>,
    tree: TreeStore,
    mut mailbox: watch::Receiver<Option<PendingWrite>>,
    done: Arc<watch::Sender<u64>>,
) {
    while mailbox.changed().await.is_ok() {
        let next = mailbox.borrow_and_update().clone();
        let Some(write) = next else { continue };
        perform(&ctx, &tree, &write).await;
        done.send_modify(|n| *n = (*n).max(write.seq));
    }
    tracing::debug!(target: "bookpath::sync", "Remote writer stopped");
}

async fn perform(ctx: &SessionContext, tree: &TreeStore, write: &PendingWrite) {
    if !ctx.is_current(write.generation) {
        tracing::debug!(
            target: "bookpath::sync",
            identity = %write.identity,
            seq = write.seq,
            generation = write.generation,
            "Discarding write from a previous identity session"
        );
        return;
    }
    match tree.save(&write.identity, &write.snapshot).await {
        Ok(()) => tracing::debug!(
            target: "bookpath::sync",
            identity = %write.identity,
            seq = write.seq,
            nodes = write.snapshot.node_count(),
            "Remote tree saved"
        ),
        Err(e) => tracing::warn!(
            target: "bookpath::sync",
            identity = %write.identity,
            seq = write.seq,
            error = %e,
            "Remote tree save failed"
        ),
    }
}
