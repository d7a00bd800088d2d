//! Repository traits consumed by the lifecycle coordinator

use crate::error::StoreError;
use plc_model::{OwnerScope, Project, ProjectDraft, ProjectId, Service, Volume, VolumeId};

/// Project records, filtered by owner on every read and write
#[async_trait::async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Fetch by identifier; `None` if missing or owned by someone else
    async fn get_by_id(
        &self,
        scope: &OwnerScope,
        id: ProjectId,
    ) -> Result<Option<Project>, StoreError>;

    /// Fetch by owner-scoped name
    async fn get_by_name(
        &self,
        scope: &OwnerScope,
        name: &str,
    ) -> Result<Option<Project>, StoreError>;

    /// All projects of the owner, oldest first
    async fn list_by_owner(&self, scope: &OwnerScope) -> Result<Vec<Project>, StoreError>;

    /// Whether the owner already has a project with this name
    async fn exists_by_name(&self, scope: &OwnerScope, name: &str) -> Result<bool, StoreError>;

    /// Persist a new project and assign its identifier
    ///
    /// # Errors
    /// `StoreError::Conflict` if (owner, name) is already taken.
    async fn insert(&self, draft: ProjectDraft) -> Result<Project, StoreError>;

    /// Replace name and description of a stored project
    ///
    /// Identifier, owner and creation time are kept from the stored record.
    /// Returns `None` if the record is not visible in `scope`.
    ///
    /// # Errors
    /// `StoreError::Conflict` if the new name is taken by another project.
    async fn replace(
        &self,
        scope: &OwnerScope,
        project: &Project,
    ) -> Result<Option<Project>, StoreError>;

    /// Remove a project; returns whether a visible record was removed
    async fn remove(&self, scope: &OwnerScope, id: ProjectId) -> Result<bool, StoreError>;
}

/// Volume records
///
/// Volumes are reached through a project that was already resolved in the
/// caller's owner scope, so they are addressed by project identifier.
#[async_trait::async_trait]
pub trait VolumeRepository: Send + Sync {
    /// Persist a volume record
    async fn insert(&self, volume: Volume) -> Result<Volume, StoreError>;

    /// All volumes that reference the project
    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Volume>, StoreError>;

    /// Remove a volume record; returns whether it existed
    async fn remove(&self, id: VolumeId) -> Result<bool, StoreError>;
}

/// Service records
#[async_trait::async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Persist a service record
    async fn insert(&self, service: Service) -> Result<Service, StoreError>;

    /// Services of a project visible in the owner scope
    async fn list_by_project(
        &self,
        scope: &OwnerScope,
        project: ProjectId,
    ) -> Result<Vec<Service>, StoreError>;

    /// Bulk removal of a project's services; returns how many were removed
    async fn remove_by_project_and_owner(
        &self,
        scope: &OwnerScope,
        project: ProjectId,
    ) -> Result<usize, StoreError>;
}
