//! Testing utilities for the PLC workspace
//!
//! A coordinator wired to in-memory backends, with handles kept on both
//! backends so tests can seed records and inspect what the coordinator did.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use plc_cluster::{ClusterCall, InMemoryCluster};
use plc_core::{CoordinatorConfig, ProjectCoordinator, Repositories};
use plc_model::{OwnerId, ProjectId, Service, Session, Volume};
use plc_store::{MemoryStore, ServiceRepository, VolumeRepository};
use std::sync::Arc;

pub struct Harness {
    pub coordinator: ProjectCoordinator,
    pub store: Arc<MemoryStore>,
    pub cluster: Arc<InMemoryCluster>,
}

impl Harness {
    /// Record a volume and create its cluster counterpart
    pub async fn seed_volume(&self, project: ProjectId, cluster_name: &str) -> Volume {
        self.cluster.add_persistent_volume(cluster_name);
        VolumeRepository::insert(&*self.store, Volume::new(project, cluster_name))
            .await
            .unwrap()
    }

    pub async fn seed_service(&self, session: &Session, project: ProjectId, name: &str) -> Service {
        ServiceRepository::insert(&*self.store, Service::new(session.owner, project, name))
            .await
            .unwrap()
    }

    /// Cluster calls made so far, without labels
    pub fn cluster_call_names(&self) -> Vec<String> {
        self.cluster
            .calls()
            .into_iter()
            .map(|call| match call {
                ClusterCall::CreateNamespace { name, .. } => format!("create_namespace {name}"),
                ClusterCall::DeleteNamespace { name } => format!("delete_namespace {name}"),
                ClusterCall::DeletePersistentVolume { name } => format!("delete_pv {name}"),
            })
            .collect()
    }
}

pub fn setup_harness() -> Harness {
    setup_harness_with_config(CoordinatorConfig::new())
}

pub fn setup_harness_with_config(config: CoordinatorConfig) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let cluster = Arc::new(InMemoryCluster::new());
    let coordinator =
        ProjectCoordinator::new(config, Repositories::shared(store.clone()), cluster.clone());
    Harness {
        coordinator,
        store,
        cluster,
    }
}

pub fn session(username: &str) -> Session {
    Session::new(OwnerId::new(), username)
}
