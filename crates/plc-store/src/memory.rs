//! In-memory document store
//!
//! Backs all three repositories with concurrent maps. The (owner, name)
//! pair is a compound unique key, claimed atomically through the name index,
//! so two concurrent inserts of the same name cannot both succeed even when
//! the caller's own existence check raced.
//!
//! One-shot fault injection ([`MemoryStore::inject_fault`]) lets tests
//! exercise collaborator failures.

use crate::error::StoreError;
use crate::repository::{ProjectRepository, ServiceRepository, VolumeRepository};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use plc_model::{
    OwnerId, OwnerScope, Project, ProjectDraft, ProjectId, Service, ServiceId, Volume, VolumeId,
};
use std::collections::HashSet;

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `get_by_id` / `get_by_name`
    GetProject,
    /// `list_by_owner`
    ListProjects,
    /// `exists_by_name`
    ExistsByName,
    /// Project `insert`
    InsertProject,
    /// Project `replace`
    ReplaceProject,
    /// Project `remove`
    RemoveProject,
    /// Volume `list_by_project`
    ListVolumes,
    /// Volume `remove`
    RemoveVolume,
    /// Service `remove_by_project_and_owner`
    RemoveServices,
}

/// In-memory metadata store
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Project records by identifier
    projects: DashMap<ProjectId, Project>,
    /// Unique index: (owner, name) -> project
    names: DashMap<(OwnerId, String), ProjectId>,
    /// Volume records
    volumes: DashMap<VolumeId, Volume>,
    /// Service records
    services: DashMap<ServiceId, Service>,
    /// Pending one-shot faults
    faults: Mutex<HashSet<StoreOp>>,
}

impl MemoryStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next call of `op` with a backend error
    pub fn inject_fault(&self, op: StoreOp) {
        self.faults.lock().insert(op);
    }

    /// Drop all pending faults
    pub fn clear_faults(&self) {
        self.faults.lock().clear();
    }

    /// Number of project records, across all owners
    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// Number of volume records
    #[must_use]
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    /// Number of service records
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        if self.faults.lock().remove(&op) {
            tracing::debug!(?op, "injected store fault");
            return Err(StoreError::backend(format!("injected fault on {op:?}")));
        }
        Ok(())
    }

    fn visible(&self, scope: &OwnerScope, id: ProjectId) -> Option<Project> {
        self.projects
            .get(&id)
            .filter(|entry| scope.admits(entry.owner))
            .map(|entry| entry.value().clone())
    }

    fn claim_name(&self, owner: OwnerId, name: &str, id: ProjectId) -> Result<(), StoreError> {
        match self.names.entry((owner, name.to_string())) {
            Entry::Occupied(entry) if *entry.get() == id => Ok(()),
            Entry::Occupied(_) => Err(StoreError::Conflict {
                field: "name",
                value: name.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        }
    }

    fn release_name(&self, owner: OwnerId, name: &str, id: ProjectId) {
        self.names
            .remove_if(&(owner, name.to_string()), |_, claimed| *claimed == id);
    }
}

#[async_trait::async_trait]
impl ProjectRepository for MemoryStore {
    async fn get_by_id(
        &self,
        scope: &OwnerScope,
        id: ProjectId,
    ) -> Result<Option<Project>, StoreError> {
        self.check(StoreOp::GetProject)?;
        Ok(self.visible(scope, id))
    }

    async fn get_by_name(
        &self,
        scope: &OwnerScope,
        name: &str,
    ) -> Result<Option<Project>, StoreError> {
        self.check(StoreOp::GetProject)?;
        let id = self
            .names
            .get(&(scope.owner(), name.to_string()))
            .map(|entry| *entry.value());
        Ok(id.and_then(|id| self.visible(scope, id)))
    }

    async fn list_by_owner(&self, scope: &OwnerScope) -> Result<Vec<Project>, StoreError> {
        self.check(StoreOp::ListProjects)?;
        let mut projects: Vec<Project> = self
            .projects
            .iter()
            .filter(|entry| scope.admits(entry.owner))
            .map(|entry| entry.value().clone())
            .collect();
        projects.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(projects)
    }

    async fn exists_by_name(&self, scope: &OwnerScope, name: &str) -> Result<bool, StoreError> {
        self.check(StoreOp::ExistsByName)?;
        Ok(self
            .names
            .contains_key(&(scope.owner(), name.to_string())))
    }

    async fn insert(&self, draft: ProjectDraft) -> Result<Project, StoreError> {
        self.check(StoreOp::InsertProject)?;
        let id = ProjectId::new();
        self.claim_name(draft.owner, &draft.name, id)?;

        let project = draft.into_project(id);
        self.projects.insert(id, project.clone());
        tracing::trace!(project = %id, "project record inserted");
        Ok(project)
    }

    async fn replace(
        &self,
        scope: &OwnerScope,
        project: &Project,
    ) -> Result<Option<Project>, StoreError> {
        self.check(StoreOp::ReplaceProject)?;
        let owner = scope.owner();

        // Claim, write and release happen under the record's write guard, so
        // replaces of one project are serialized and the index always follows
        // the stored name. Lock order is projects, then names.
        let Some(mut stored) = self
            .projects
            .get_mut(&project.id)
            .filter(|stored| scope.admits(stored.owner))
        else {
            return Ok(None);
        };

        let previous = stored.name.clone();
        let renamed = previous != project.name;
        if renamed {
            self.claim_name(owner, &project.name, project.id)?;
        }

        stored.name.clone_from(&project.name);
        stored.description.clone_from(&project.description);
        stored.updated_at = project.updated_at;

        if renamed {
            self.release_name(owner, &previous, project.id);
        }
        Ok(Some(stored.value().clone()))
    }

    async fn remove(&self, scope: &OwnerScope, id: ProjectId) -> Result<bool, StoreError> {
        self.check(StoreOp::RemoveProject)?;
        match self
            .projects
            .remove_if(&id, |_, stored| scope.admits(stored.owner))
        {
            Some((_, removed)) => {
                self.release_name(removed.owner, &removed.name, id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait::async_trait]
impl VolumeRepository for MemoryStore {
    async fn insert(&self, volume: Volume) -> Result<Volume, StoreError> {
        self.volumes.insert(volume.id, volume.clone());
        Ok(volume)
    }

    async fn list_by_project(&self, project: ProjectId) -> Result<Vec<Volume>, StoreError> {
        self.check(StoreOp::ListVolumes)?;
        let mut volumes: Vec<Volume> = self
            .volumes
            .iter()
            .filter(|entry| entry.project == project)
            .map(|entry| entry.value().clone())
            .collect();
        volumes.sort_by(|a, b| a.cluster_name.cmp(&b.cluster_name));
        Ok(volumes)
    }

    async fn remove(&self, id: VolumeId) -> Result<bool, StoreError> {
        self.check(StoreOp::RemoveVolume)?;
        Ok(self.volumes.remove(&id).is_some())
    }
}

#[async_trait::async_trait]
impl ServiceRepository for MemoryStore {
    async fn insert(&self, service: Service) -> Result<Service, StoreError> {
        self.services.insert(service.id, service.clone());
        Ok(service)
    }

    async fn list_by_project(
        &self,
        scope: &OwnerScope,
        project: ProjectId,
    ) -> Result<Vec<Service>, StoreError> {
        Ok(self
            .services
            .iter()
            .filter(|entry| entry.project == project && scope.admits(entry.owner))
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn remove_by_project_and_owner(
        &self,
        scope: &OwnerScope,
        project: ProjectId,
    ) -> Result<usize, StoreError> {
        self.check(StoreOp::RemoveServices)?;
        let mut removed = 0;
        self.services.retain(|_, service| {
            let matched = service.project == project && scope.admits(service.owner);
            if matched {
                removed += 1;
            }
            !matched
        });
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plc_model::Session;
    use pretty_assertions::assert_eq;

    fn alice() -> Session {
        Session::new(OwnerId::new(), "alice")
    }

    async fn add(store: &MemoryStore, owner: OwnerId, name: &str) -> Result<Project, StoreError> {
        ProjectRepository::insert(store, ProjectDraft::new(owner, name, "")).await
    }

    #[tokio::test]
    async fn insert_assigns_identifier_and_indexes_name() {
        let store = MemoryStore::new();
        let session = alice();

        let project = add(&store, session.owner, "web").await.unwrap();

        assert!(store.exists_by_name(&session.scope(), "web").await.unwrap());
        assert_eq!(
            store.get_by_name(&session.scope(), "web").await.unwrap(),
            Some(project.clone())
        );
        assert_eq!(
            store.get_by_id(&session.scope(), project.id).await.unwrap(),
            Some(project)
        );
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict_per_owner() {
        let store = MemoryStore::new();
        let a = alice();
        let b = Session::new(OwnerId::new(), "bob");

        add(&store, a.owner, "web").await.unwrap();
        let err = add(&store, a.owner, "web").await.unwrap_err();
        assert!(err.is_conflict());

        // same name under another owner is fine
        assert!(add(&store, b.owner, "web").await.is_ok());
        assert_eq!(store.project_count(), 2);
    }

    #[tokio::test]
    async fn other_owner_sees_nothing() {
        let store = MemoryStore::new();
        let a = alice();
        let b = Session::new(OwnerId::new(), "bob");
        let project = add(&store, a.owner, "web").await.unwrap();

        let scope = b.scope();
        assert_eq!(store.get_by_id(&scope, project.id).await.unwrap(), None);
        assert_eq!(store.get_by_name(&scope, "web").await.unwrap(), None);
        assert!(!store.exists_by_name(&scope, "web").await.unwrap());
        assert!(store.list_by_owner(&scope).await.unwrap().is_empty());

        let mut hijack = project.clone();
        hijack.name = "mine".to_string();
        assert_eq!(store.replace(&scope, &hijack).await.unwrap(), None);
        assert!(!ProjectRepository::remove(&store, &scope, project.id).await.unwrap());
        assert_eq!(
            store.get_by_id(&a.scope(), project.id).await.unwrap(),
            Some(project)
        );
    }

    #[tokio::test]
    async fn rename_moves_the_unique_key() {
        let store = MemoryStore::new();
        let session = alice();
        let scope = session.scope();
        let mut project = add(&store, session.owner, "web").await.unwrap();

        project.name = "api".to_string();
        project.description = "gateway".to_string();
        let stored = store.replace(&scope, &project).await.unwrap().unwrap();
        assert_eq!(stored.name, "api");
        assert_eq!(stored.description, "gateway");

        assert!(!store.exists_by_name(&scope, "web").await.unwrap());
        assert!(store.exists_by_name(&scope, "api").await.unwrap());
        assert!(add(&store, session.owner, "web").await.is_ok());
    }

    #[tokio::test]
    async fn rename_onto_taken_name_conflicts() {
        let store = MemoryStore::new();
        let session = alice();
        let scope = session.scope();
        let mut web = add(&store, session.owner, "web").await.unwrap();
        add(&store, session.owner, "api").await.unwrap();

        web.name = "api".to_string();
        assert!(store.replace(&scope, &web).await.unwrap_err().is_conflict());
        assert_eq!(
            store.get_by_id(&scope, web.id).await.unwrap().unwrap().name,
            "web"
        );
    }

    #[tokio::test]
    async fn concurrent_inserts_of_one_name_admit_one() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let owner = OwnerId::new();

        let attempts = (0..8).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { add(&store, owner, "web").await })
        });
        let results = futures::future::join_all(attempts).await;

        let winners = results
            .into_iter()
            .filter(|r| matches!(r, Ok(Ok(_))))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(store.project_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_renames_leave_only_the_stored_name_claimed() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let session = alice();
        let scope = session.scope();

        for _ in 0..500 {
            let project = add(&store, session.owner, "web").await.unwrap();
            let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(2));

            let renames = ["api", "db"].map(|name| {
                let store = store.clone();
                let barrier = barrier.clone();
                let mut renamed = project.clone();
                renamed.name = name.to_string();
                tokio::spawn(async move {
                    barrier.wait().await;
                    store.replace(&scope, &renamed).await
                })
            });
            for outcome in futures::future::join_all(renames).await {
                assert!(outcome.unwrap().unwrap().is_some());
            }

            let stored = store.get_by_id(&scope, project.id).await.unwrap().unwrap();
            assert!(stored.name == "api" || stored.name == "db", "{}", stored.name);
            for name in ["web", "api", "db"] {
                assert_eq!(
                    store.exists_by_name(&scope, name).await.unwrap(),
                    name == stored.name,
                    "stored name {}, checked {name}",
                    stored.name
                );
            }
            assert!(ProjectRepository::remove(&*store, &scope, project.id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn removing_services_is_scoped_by_owner() {
        let store = MemoryStore::new();
        let a = alice();
        let b = Session::new(OwnerId::new(), "bob");
        let project = ProjectId::new();

        for (owner, name) in [(a.owner, "db"), (a.owner, "cache"), (b.owner, "other")] {
            ServiceRepository::insert(&store, Service::new(owner, project, name))
                .await
                .unwrap();
        }

        let removed = store
            .remove_by_project_and_owner(&a.scope(), project)
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.service_count(), 1);
        assert_eq!(
            ServiceRepository::list_by_project(&store, &b.scope(), project)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn volumes_listed_by_project_in_name_order() {
        let store = MemoryStore::new();
        let project = ProjectId::new();
        for volume in [
            Volume::new(project, "pv-b"),
            Volume::new(project, "pv-a"),
            Volume::new(ProjectId::new(), "pv-c"),
        ] {
            VolumeRepository::insert(&store, volume).await.unwrap();
        }

        let names: Vec<String> = VolumeRepository::list_by_project(&store, project)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.cluster_name)
            .collect();
        assert_eq!(names, vec!["pv-a".to_string(), "pv-b".to_string()]);
    }

    #[tokio::test]
    async fn injected_fault_fires_once() {
        let store = MemoryStore::new();
        let scope = alice().scope();
        store.inject_fault(StoreOp::ListProjects);

        assert!(matches!(
            store.list_by_owner(&scope).await,
            Err(StoreError::Backend(_))
        ));
        assert!(store.list_by_owner(&scope).await.is_ok());
    }
}
