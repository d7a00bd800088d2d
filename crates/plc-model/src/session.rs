//! Authenticated identity and owner scope

use crate::ids::OwnerId;
use serde::{Deserialize, Serialize};

/// Identity attached to a request by the authentication layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owning user
    pub owner: OwnerId,
    /// Login name, used to label cluster resources
    pub username: String,
}

impl Session {
    /// Create new session
    #[inline]
    #[must_use]
    pub fn new(owner: OwnerId, username: impl Into<String>) -> Self {
        Self {
            owner,
            username: username.into(),
        }
    }

    /// Scope every store call made on behalf of this session
    #[inline]
    #[must_use]
    pub fn scope(&self) -> OwnerScope {
        OwnerScope::new(self.owner)
    }
}

/// Owner filter carried explicitly by every owner-scoped store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerScope {
    owner: OwnerId,
}

impl OwnerScope {
    /// Create new scope
    #[inline]
    #[must_use]
    pub fn new(owner: OwnerId) -> Self {
        Self { owner }
    }

    /// Owner this scope filters by
    #[inline]
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Whether a record owned by `owner` is visible in this scope
    #[inline]
    #[must_use]
    pub fn admits(&self, owner: OwnerId) -> bool {
        self.owner == owner
    }
}

impl std::fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "owner:{}", self.owner)
    }
}
