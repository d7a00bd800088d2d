//! Cluster resource client trait

use crate::error::ClusterError;
use std::collections::BTreeMap;

/// Resource labels, ordered for stable output
pub type Labels = BTreeMap<String, String>;

/// Operations the coordinator issues against the orchestrator
///
/// Implementations own their timeout and retry policy; callers issue each
/// call once.
#[async_trait::async_trait]
pub trait ClusterClient: Send + Sync {
    /// Provision an isolated namespace
    ///
    /// # Errors
    /// `ClusterError::AlreadyExists` if the namespace is present.
    async fn create_namespace(&self, name: &str, labels: &Labels) -> Result<(), ClusterError>;

    /// Delete a namespace and everything the orchestrator scoped under it
    ///
    /// # Errors
    /// `ClusterError::NotFound` if the namespace is absent.
    async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError>;

    /// Delete a cluster-scoped persistent volume
    ///
    /// # Errors
    /// `ClusterError::NotFound` if the volume is absent.
    async fn delete_persistent_volume(&self, name: &str) -> Result<(), ClusterError>;
}
