//! Error types for cluster calls

use serde::{Deserialize, Serialize};

/// Kind of cluster resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Namespace
    Namespace,
    /// Persistent volume
    PersistentVolume,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespace => write!(f, "namespace"),
            Self::PersistentVolume => write!(f, "persistent volume"),
        }
    }
}

/// Cluster client errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClusterError {
    /// Resource does not exist
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// Resource kind
        kind: ResourceKind,
        /// Resource name
        name: String,
    },

    /// Resource already exists
    #[error("{kind} '{name}' already exists")]
    AlreadyExists {
        /// Resource kind
        kind: ResourceKind,
        /// Resource name
        name: String,
    },

    /// Orchestrator rejected or failed the call
    #[error("orchestrator error: {0}")]
    Api(String),
}

impl ClusterError {
    /// Create API error
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    /// Check if error reports a missing resource
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ClusterError::NotFound {
            kind: ResourceKind::PersistentVolume,
            name: "pv-1".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "persistent volume 'pv-1' not found");
        assert!(!ClusterError::api("timeout").is_not_found());
    }
}
