//! In-memory orchestrator
//!
//! Keeps namespaces and persistent volumes in concurrent maps, records
//! every call in a journal (failed calls included) and supports one-shot
//! faults, optionally aimed at a single resource name.

use crate::client::{ClusterClient, Labels};
use crate::error::{ClusterError, ResourceKind};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Cluster operation, for fault targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterOp {
    /// `create_namespace`
    CreateNamespace,
    /// `delete_namespace`
    DeleteNamespace,
    /// `delete_persistent_volume`
    DeletePersistentVolume,
}

/// Journal entry for a call made against the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    /// Namespace creation
    CreateNamespace {
        /// Namespace name
        name: String,
        /// Labels requested
        labels: Labels,
    },
    /// Namespace deletion
    DeleteNamespace {
        /// Namespace name
        name: String,
    },
    /// Persistent volume deletion
    DeletePersistentVolume {
        /// Volume name
        name: String,
    },
}

#[derive(Debug)]
struct Fault {
    op: ClusterOp,
    target: Option<String>,
}

/// In-memory orchestrator
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    /// Namespaces and their labels
    namespaces: DashMap<String, Labels>,
    /// Persistent volumes by name
    persistent_volumes: DashMap<String, ()>,
    /// Every call, in order
    journal: Mutex<Vec<ClusterCall>>,
    /// Pending one-shot faults
    faults: Mutex<Vec<Fault>>,
}

impl InMemoryCluster {
    /// Create empty cluster
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a persistent volume out of band
    pub fn add_persistent_volume(&self, name: impl Into<String>) {
        self.persistent_volumes.insert(name.into(), ());
    }

    /// Fail the next `op`; with `target`, only a call on that resource name
    pub fn inject_fault(&self, op: ClusterOp, target: Option<&str>) {
        self.faults.lock().push(Fault {
            op,
            target: target.map(str::to_string),
        });
    }

    /// Whether the namespace exists
    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    /// Labels of a namespace
    #[must_use]
    pub fn namespace_labels(&self, name: &str) -> Option<Labels> {
        self.namespaces.get(name).map(|entry| entry.value().clone())
    }

    /// Whether the persistent volume exists
    #[must_use]
    pub fn has_persistent_volume(&self, name: &str) -> bool {
        self.persistent_volumes.contains_key(name)
    }

    /// Number of namespaces
    #[must_use]
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Copy of the call journal
    #[must_use]
    pub fn calls(&self) -> Vec<ClusterCall> {
        self.journal.lock().clone()
    }

    fn record(&self, call: ClusterCall) {
        self.journal.lock().push(call);
    }

    fn check(&self, op: ClusterOp, name: &str) -> Result<(), ClusterError> {
        let mut faults = self.faults.lock();
        let hit = faults
            .iter()
            .position(|f| f.op == op && f.target.as_deref().map_or(true, |t| t == name));
        match hit {
            Some(idx) => {
                faults.remove(idx);
                tracing::debug!(?op, name, "injected cluster fault");
                Err(ClusterError::api(format!("injected fault on {op:?} '{name}'")))
            }
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl ClusterClient for InMemoryCluster {
    async fn create_namespace(&self, name: &str, labels: &Labels) -> Result<(), ClusterError> {
        self.record(ClusterCall::CreateNamespace {
            name: name.to_string(),
            labels: labels.clone(),
        });
        self.check(ClusterOp::CreateNamespace, name)?;

        match self.namespaces.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ClusterError::AlreadyExists {
                kind: ResourceKind::Namespace,
                name: name.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(labels.clone());
                Ok(())
            }
        }
    }

    async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError> {
        self.record(ClusterCall::DeleteNamespace {
            name: name.to_string(),
        });
        self.check(ClusterOp::DeleteNamespace, name)?;

        self.namespaces
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ClusterError::NotFound {
                kind: ResourceKind::Namespace,
                name: name.to_string(),
            })
    }

    async fn delete_persistent_volume(&self, name: &str) -> Result<(), ClusterError> {
        self.record(ClusterCall::DeletePersistentVolume {
            name: name.to_string(),
        });
        self.check(ClusterOp::DeletePersistentVolume, name)?;

        self.persistent_volumes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ClusterError::NotFound {
                kind: ResourceKind::PersistentVolume,
                name: name.to_string(),
            })
    }
}
