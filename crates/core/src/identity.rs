//! Acting identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a user's tree document is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Wrap a provider-issued id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Profile reported by the identity provider on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-unique user id.
    pub uid: String,
    /// Name shown in the toolbar.
    pub display_name: Option<String>,
}

impl UserProfile {
    /// Build a profile.
    pub fn new(uid: impl Into<String>, display_name: Option<&str>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.map(str::to_string),
        }
    }
}

/// How an identity was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    /// A signed-in user.
    Authenticated,
    /// The shared well-known account used before anyone signs in.
    Fallback,
}

/// A resolved acting identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Document key.
    pub id: IdentityId,
    /// Display name, if the provider supplied one.
    pub display_name: Option<String>,
    /// Authenticated or fallback.
    pub kind: IdentityKind,
}

impl Identity {
    /// Identity for a signed-in user.
    pub fn authenticated(profile: UserProfile) -> Self {
        Self {
            id: IdentityId::new(profile.uid),
            display_name: profile.display_name,
            kind: IdentityKind::Authenticated,
        }
    }

    /// The fallback identity with the given well-known id.
    pub fn fallback(id: impl Into<String>) -> Self {
        Self {
            id: IdentityId::new(id),
            display_name: None,
            kind: IdentityKind::Fallback,
        }
    }

    /// True for a signed-in user.
    pub fn is_authenticated(&self) -> bool {
        self.kind == IdentityKind::Authenticated
    }
}
