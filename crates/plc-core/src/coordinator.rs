//! Project Lifecycle Coordinator
//!
//! Orchestrates create, update and remove across the metadata store and
//! the cluster orchestrator. The two systems share no commit protocol; the
//! coordinator fixes the order of calls and classifies each failure once.
//! It never retries and holds no locks of its own.
//!
//! # Known consistency gaps
//!
//! - **Create**: the record is inserted before the namespace is provisioned.
//!   If provisioning fails the record stays, unless
//!   [`CreateFailurePolicy::Compensate`] is configured.
//! - **Remove**: the volume loop stops at the first failure. Volumes already
//!   handled are gone, the rest are untouched, and the namespace is already
//!   deleted, so a retried remove fails at the namespace step.
//! - **Names**: the uniqueness check is read-then-write. Only a store that
//!   enforces (owner, name) as a unique key rules out duplicates under
//!   concurrent create/rename.
//!
//! Each gap is logged at `warn` when it is hit.

use crate::config::{CoordinatorConfig, CreateFailurePolicy};
use crate::error::{CoordinatorError, Step};
use crate::guard::UniquenessGuard;
use crate::resolver::IdentifierResolver;
use chrono::Utc;
use plc_cluster::{ClusterClient, Labels};
use plc_model::{
    validate_project_name, NewProject, Project, ProjectDraft, ProjectId, ProjectPatch, Reference,
    Session,
};
use plc_store::{ProjectRepository, ServiceRepository, VolumeRepository};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata repository handles
#[derive(Clone)]
pub struct Repositories {
    /// Project records
    pub projects: Arc<dyn ProjectRepository>,
    /// Volume records
    pub volumes: Arc<dyn VolumeRepository>,
    /// Service records
    pub services: Arc<dyn ServiceRepository>,
}

impl Repositories {
    /// Use one backend for all three record types
    #[must_use]
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ProjectRepository + VolumeRepository + ServiceRepository + 'static,
    {
        Self {
            projects: store.clone(),
            volumes: store.clone(),
            services: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// Outcome of a completed removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalReport {
    /// Removed project
    pub project: ProjectId,
    /// Volume records and cluster volumes removed
    pub volumes_removed: usize,
    /// Service records removed
    pub services_removed: usize,
}

/// The lifecycle coordinator
///
/// Collaborators are injected at construction; the caller's identity is an
/// explicit argument of every operation.
pub struct ProjectCoordinator {
    /// Configuration
    config: CoordinatorConfig,
    /// Project records
    projects: Arc<dyn ProjectRepository>,
    /// Volume records
    volumes: Arc<dyn VolumeRepository>,
    /// Service records
    services: Arc<dyn ServiceRepository>,
    /// Orchestrator
    cluster: Arc<dyn ClusterClient>,
    /// Reference resolution
    resolver: IdentifierResolver,
    /// Name uniqueness
    guard: UniquenessGuard,
}

impl ProjectCoordinator {
    /// Create new coordinator
    #[must_use]
    pub fn new(
        config: CoordinatorConfig,
        repositories: Repositories,
        cluster: Arc<dyn ClusterClient>,
    ) -> Self {
        Self {
            resolver: IdentifierResolver::new(repositories.projects.clone()),
            guard: UniquenessGuard::new(repositories.projects.clone()),
            config,
            projects: repositories.projects,
            volumes: repositories.volumes,
            services: repositories.services,
            cluster,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// All projects of the caller
    ///
    /// # Errors
    /// `CoordinatorError::Store` if listing fails.
    #[tracing::instrument(skip_all, fields(owner = %session.owner))]
    pub async fn list(&self, session: &Session) -> Result<Vec<Project>, CoordinatorError> {
        let projects = self
            .projects
            .list_by_owner(&session.scope())
            .await
            .map_err(CoordinatorError::store_at(Step::ListProjects))?;
        tracing::debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// A single project, by identifier or name
    ///
    /// # Errors
    /// `CoordinatorError::NotFound` if the reference does not resolve.
    #[tracing::instrument(skip_all, fields(owner = %session.owner, reference = %reference))]
    pub async fn get(
        &self,
        session: &Session,
        reference: &Reference,
    ) -> Result<Project, CoordinatorError> {
        self.resolver.resolve(&session.scope(), reference).await
    }

    /// Create a project and provision its namespace
    ///
    /// # Workflow
    /// 1. Validate the name
    /// 2. Check the name is free for the owner
    /// 3. Insert the record; the store assigns the identifier
    /// 4. Provision a namespace named by the identifier, labelled with the
    ///    owner's username
    ///
    /// # Errors
    /// - `BadParameter` for a missing or invalid name
    /// - `NotUnique` if the owner already has the name
    /// - `Store` / `Cluster` for collaborator failures; a failure at
    ///   [`Step::ProvisionNamespace`] leaves the record in place under
    ///   [`CreateFailurePolicy::Keep`]
    #[tracing::instrument(skip_all, fields(owner = %session.owner))]
    pub async fn create(
        &self,
        session: &Session,
        request: NewProject,
    ) -> Result<Project, CoordinatorError> {
        let scope = session.scope();

        let Some(name) = request.name else {
            return Err(CoordinatorError::BadParameter {
                parameter: "name",
                reason: "missing".to_string(),
            });
        };
        self.validate_name(&name)?;
        let description = request.description.unwrap_or_default();

        self.guard.ensure_available(&scope, &name).await?;

        let project = self
            .projects
            .insert(ProjectDraft::new(session.owner, name, description))
            .await
            .map_err(CoordinatorError::store_at(Step::InsertRecord))?;
        tracing::debug!(project = %project.id, name = %project.name, "project record inserted");

        let namespace = project.id.namespace_name();
        if let Err(source) = self
            .cluster
            .create_namespace(&namespace, &self.namespace_labels(session))
            .await
        {
            tracing::error!(
                project = %project.id,
                error = %source,
                "namespace provisioning failed"
            );
            self.after_failed_provision(session, &project).await;
            return Err(CoordinatorError::cluster_at(Step::ProvisionNamespace)(source));
        }

        tracing::info!(project = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    /// Change name and/or description
    ///
    /// Absent patch fields keep their stored value. The cluster is not
    /// touched.
    ///
    /// # Errors
    /// - `BadParameter` for an invalid new name
    /// - `NotFound` if the reference does not resolve
    /// - `NotUnique` if the new name is taken
    #[tracing::instrument(skip_all, fields(owner = %session.owner, reference = %reference))]
    pub async fn update(
        &self,
        session: &Session,
        reference: &Reference,
        patch: ProjectPatch,
    ) -> Result<Project, CoordinatorError> {
        let scope = session.scope();
        if let Some(name) = &patch.name {
            self.validate_name(name)?;
        }

        let mut project = self.resolver.resolve(&scope, reference).await?;
        let renamed = patch.apply_to(&mut project);

        // Addressed by its current name and kept: nothing to check against.
        // Renames addressed by identifier rely on the store's unique key.
        if renamed && !reference.is_identifier() {
            self.guard.ensure_available(&scope, &project.name).await?;
        }

        project.updated_at = Utc::now();
        let updated = self
            .projects
            .replace(&scope, &project)
            .await
            .map_err(CoordinatorError::store_at(Step::ReplaceRecord))?
            .ok_or_else(CoordinatorError::project_not_found)?;

        tracing::info!(project = %updated.id, name = %updated.name, renamed, "project updated");
        Ok(updated)
    }

    /// Remove a project with its namespace, volumes and services
    ///
    /// # Workflow
    /// 1. Resolve the reference within the owner scope
    /// 2. Delete the namespace; on failure nothing else is attempted
    /// 3. For each volume: delete the cluster volume, then its record
    /// 4. Bulk-remove the owner's services of the project
    /// 5. Remove the project record
    ///
    /// Leaf records go before the project record, so as long as the record
    /// exists a later call can still see what is left.
    ///
    /// # Errors
    /// - `NotFound` if the reference does not resolve, including on a
    ///   second remove of the same project
    /// - `Store` / `Cluster` tagged with the step that failed
    #[tracing::instrument(skip_all, fields(owner = %session.owner, reference = %reference))]
    pub async fn remove(
        &self,
        session: &Session,
        reference: &Reference,
    ) -> Result<RemovalReport, CoordinatorError> {
        let scope = session.scope();
        let project = self.resolver.resolve(&scope, reference).await?;
        let id = project.id;

        self.cluster
            .delete_namespace(&id.namespace_name())
            .await
            .map_err(|source| {
                tracing::error!(project = %id, error = %source, "namespace deletion failed");
                CoordinatorError::cluster_at(Step::DeleteNamespace)(source)
            })?;
        tracing::debug!(project = %id, "namespace deleted");

        let volumes = self
            .volumes
            .list_by_project(id)
            .await
            .map_err(CoordinatorError::store_at(Step::ListVolumes))?;

        for (done, volume) in volumes.iter().enumerate() {
            let remaining = volumes.len() - done;
            if let Err(source) = self.cluster.delete_persistent_volume(&volume.cluster_name).await {
                tracing::warn!(
                    project = %id,
                    volume = %volume.id,
                    done,
                    remaining,
                    error = %source,
                    "volume cleanup aborted, project left partially removed"
                );
                return Err(CoordinatorError::cluster_at(Step::DeletePersistentVolume)(source));
            }
            if let Err(source) = self.volumes.remove(volume.id).await {
                tracing::warn!(
                    project = %id,
                    volume = %volume.id,
                    done,
                    remaining,
                    error = %source,
                    "volume record left behind its cluster volume"
                );
                return Err(CoordinatorError::from_store(Step::RemoveVolumeRecord, source));
            }
        }

        let services_removed = self
            .services
            .remove_by_project_and_owner(&scope, id)
            .await
            .map_err(CoordinatorError::store_at(Step::RemoveServices))?;

        let removed = self
            .projects
            .remove(&scope, id)
            .await
            .map_err(CoordinatorError::store_at(Step::RemoveRecord))?;
        if !removed {
            return Err(CoordinatorError::project_not_found());
        }

        tracing::info!(
            project = %id,
            volumes = volumes.len(),
            services = services_removed,
            "project removed"
        );
        Ok(RemovalReport {
            project: id,
            volumes_removed: volumes.len(),
            services_removed,
        })
    }

    fn validate_name(&self, name: &str) -> Result<(), CoordinatorError> {
        validate_project_name(name, self.config.max_name_length)
            .map_err(|e| CoordinatorError::bad_name(&e))
    }

    fn namespace_labels(&self, session: &Session) -> Labels {
        Labels::from([(
            self.config.namespace_owner_label.clone(),
            session.username.clone(),
        )])
    }

    /// Apply the create failure policy; returns whether the record was removed
    async fn after_failed_provision(&self, session: &Session, project: &Project) -> bool {
        match self.config.create_failure_policy {
            CreateFailurePolicy::Keep => {
                tracing::warn!(
                    project = %project.id,
                    "project record kept without a namespace"
                );
                false
            }
            CreateFailurePolicy::Compensate => {
                match self.projects.remove(&session.scope(), project.id).await {
                    Ok(true) => {
                        tracing::info!(project = %project.id, "project record rolled back");
                        true
                    }
                    Ok(false) => {
                        tracing::warn!(
                            project = %project.id,
                            step = %Step::CompensateInsert,
                            "rollback found no project record to remove"
                        );
                        false
                    }
                    Err(error) => {
                        tracing::warn!(
                            project = %project.id,
                            step = %Step::CompensateInsert,
                            %error,
                            "rollback failed, project record kept without a namespace"
                        );
                        false
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ProjectCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCoordinator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
