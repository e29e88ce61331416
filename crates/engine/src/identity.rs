//! Identity resolution.
//!
//! Translates identity-provider events into identity transitions on the
//! shared [`SessionContext`]:
//!
//! | Event       | New state                                   |
//! |-------------|---------------------------------------------|
//! | `SignedIn`  | `Resolved(Authenticated)`                   |
//! | `NoSession` | `Resolved(Fallback)`                        |
//! | `SignedOut` | `Unresolved` (reset), then `Resolved(Fallback)` |
//!
//! Loading the new identity's snapshot is the session's job; the resolver
//! only decides who is acting.

use std::sync::Arc;

use bookpath_core::{Identity, UserProfile};

use crate::context::{IdentityState, SessionContext};

/// Event reported by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// A user signed in (or an existing session was restored).
    SignedIn(UserProfile),
    /// The provider finished checking and nobody is signed in.
    NoSession,
    /// The current user signed out.
    SignedOut,
}

/// Resolves the acting identity from provider events.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    ctx: Arc<SessionContext>,
}

impl IdentityResolver {
    /// Create a resolver publishing into `ctx`.
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// Current state.
    pub fn state(&self) -> IdentityState {
        self.ctx.identity()
    }

    /// Apply a provider event and return the identity now acting.
    pub fn apply(&self, event: AuthEvent) -> Identity {
        let identity = match event {
            AuthEvent::SignedIn(profile) => Identity::authenticated(profile),
            AuthEvent::NoSession => self.fallback(),
            AuthEvent::SignedOut => {
                let generation = self.ctx.reset();
                tracing::info!(target: "bookpath::identity", generation, "Signed out");
                self.fallback()
            }
        };
        let generation = self
            .ctx
            .publish(IdentityState::Resolved(identity.clone()));
        tracing::info!(
            target: "bookpath::identity",
            identity = %identity.id,
            kind = ?identity.kind,
            generation,
            "Identity resolved"
        );
        identity
    }

    fn fallback(&self) -> Identity {
        Identity::fallback(self.ctx.config().fallback_identity.clone())
    }
}
