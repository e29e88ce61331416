//! Process-wide session context.
//!
//! One `SessionContext` is built at startup and shared (via `Arc`) by the
//! identity resolver, the graph controller and the remote writer. It owns:
//! - the configuration
//! - the current identity, published on a watch channel
//! - the session generation, bumped on every identity transition
//! - the runtime handle remote writes are spawned on
//!
//! ## Lifecycle
//!
//! ```text
//! [init] --> Unresolved --> Resolved(id) --[reset]--> Unresolved --> ...
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bookpath_core::{Identity, IdentityKind};
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::config::BookPathConfig;

/// Identity resolution state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// The identity provider has not reported yet.
    #[default]
    Unresolved,
    /// An identity is acting.
    Resolved(Identity),
}

impl IdentityState {
    /// The resolved identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            IdentityState::Resolved(id) => Some(id),
            IdentityState::Unresolved => None,
        }
    }
}

/// Shared session state.
#[derive(Debug)]
pub struct SessionContext {
    config: BookPathConfig,
    identity: watch::Sender<IdentityState>,
    generation: AtomicU64,
    runtime: Handle,
}

impl SessionContext {
    /// Start a session: identity unresolved, generation 0.
    pub fn init(config: BookPathConfig, runtime: Handle) -> Arc<Self> {
        let (identity, _) = watch::channel(IdentityState::Unresolved);
        Arc::new(Self {
            config,
            identity,
            generation: AtomicU64::new(0),
            runtime,
        })
    }

    /// Session configuration.
    pub fn config(&self) -> &BookPathConfig {
        &self.config
    }

    /// Runtime for background work.
    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Current identity state.
    pub fn identity(&self) -> IdentityState {
        self.identity.borrow().clone()
    }

    /// Resolved identity, if any.
    pub fn resolved_identity(&self) -> Option<Identity> {
        self.identity.borrow().identity().cloned()
    }

    /// Resolved identity that is allowed to edit and write remotely.
    ///
    /// The fallback identity qualifies unless `fallback_read_only` is set.
    pub fn editing_identity(&self) -> Option<Identity> {
        self.resolved_identity().filter(|id| {
            id.kind == IdentityKind::Authenticated || !self.config.fallback_read_only
        })
    }

    /// Receive every identity transition.
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.identity.subscribe()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// True if `generation` is still the current one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Publish a new identity state and start a new generation.
    pub(crate) fn publish(&self, state: IdentityState) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.identity.send_replace(state);
        generation
    }

    /// End the current identity's session (sign-out).
    ///
    /// Writes queued under the old generation will be discarded.
    pub fn reset(&self) -> u64 {
        self.publish(IdentityState::Unresolved)
    }
}
