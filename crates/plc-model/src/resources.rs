//! Records that hang off a project

use crate::ids::{OwnerId, ProjectId, ServiceId, VolumeId};
use serde::{Deserialize, Serialize};

/// Persistent volume record
///
/// `project` is a back-reference; a volume is removed together with its
/// project and never outlives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume identifier
    pub id: VolumeId,
    /// Project the volume belongs to
    pub project: ProjectId,
    /// Name of the cluster-side persistent volume
    pub cluster_name: String,
}

impl Volume {
    /// Create new volume record
    #[inline]
    #[must_use]
    pub fn new(project: ProjectId, cluster_name: impl Into<String>) -> Self {
        Self {
            id: VolumeId::new(),
            project,
            cluster_name: cluster_name.into(),
        }
    }
}

/// Service record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Service identifier
    pub id: ServiceId,
    /// Project the service belongs to
    pub project: ProjectId,
    /// Owning user
    pub owner: OwnerId,
    /// Service name
    pub name: String,
}

impl Service {
    /// Create new service record
    #[inline]
    #[must_use]
    pub fn new(owner: OwnerId, project: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id: ServiceId::new(),
            project,
            owner,
            name: name.into(),
        }
    }
}
