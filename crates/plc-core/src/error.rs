//! Error types for the lifecycle coordinator
//!
//! Every collaborator failure is classified once:
//! - a unique-key conflict from the store becomes `NotUnique`
//! - anything else from the store or the orchestrator becomes an internal
//!   error tagged with the lifecycle [`Step`] that failed
//!
//! The step tells an operator what may have been left behind, e.g. a
//! failure at [`Step::DeletePersistentVolume`] means the namespace is gone
//! but some volume records remain.

use plc_cluster::ClusterError;
use plc_model::NameError;
use plc_store::StoreError;
use serde::{Deserialize, Serialize};

/// Lifecycle step a collaborator call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Listing the owner's projects
    ListProjects,
    /// Resolving a reference to a record
    ResolveReference,
    /// Uniqueness check on a name
    CheckName,
    /// Inserting the project record
    InsertRecord,
    /// Provisioning the project namespace
    ProvisionNamespace,
    /// Removing the record after a failed provision
    CompensateInsert,
    /// Replacing the project record
    ReplaceRecord,
    /// Deleting the project namespace
    DeleteNamespace,
    /// Listing the project's volumes
    ListVolumes,
    /// Deleting a cluster persistent volume
    DeletePersistentVolume,
    /// Removing a volume record
    RemoveVolumeRecord,
    /// Bulk removal of service records
    RemoveServices,
    /// Removing the project record
    RemoveRecord,
}

impl Step {
    /// Stable name for logs and responses
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListProjects => "list_projects",
            Self::ResolveReference => "resolve_reference",
            Self::CheckName => "check_name",
            Self::InsertRecord => "insert_record",
            Self::ProvisionNamespace => "provision_namespace",
            Self::CompensateInsert => "compensate_insert",
            Self::ReplaceRecord => "replace_record",
            Self::DeleteNamespace => "delete_namespace",
            Self::ListVolumes => "list_volumes",
            Self::DeletePersistentVolume => "delete_persistent_volume",
            Self::RemoveVolumeRecord => "remove_volume_record",
            Self::RemoveServices => "remove_services",
            Self::RemoveRecord => "remove_record",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main coordinator error type
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// Malformed or missing parameter
    #[error("bad parameter '{parameter}': {reason}")]
    BadParameter {
        /// Parameter name
        parameter: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Reference does not resolve within the owner scope
    #[error("{entity} not found")]
    NotFound {
        /// Entity addressed
        entity: &'static str,
    },

    /// Name collision within the owner scope
    #[error("{entity} {field} is already in use")]
    NotUnique {
        /// Entity addressed
        entity: &'static str,
        /// Colliding field
        field: &'static str,
    },

    /// No authenticated session
    #[error("unauthorized")]
    Unauthorized,

    /// Metadata store failure
    #[error("metadata store failed at {step}: {source}")]
    Store {
        /// Step that failed
        step: Step,
        /// Store error
        #[source]
        source: StoreError,
    },

    /// Orchestrator failure
    #[error("cluster call failed at {step}: {source}")]
    Cluster {
        /// Step that failed
        step: Step,
        /// Cluster error
        #[source]
        source: ClusterError,
    },
}

/// Error classification surfaced at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input
    BadParameter,
    /// Unknown reference
    NotFound,
    /// Name collision
    NotUnique,
    /// Missing session
    Unauthorized,
    /// Any unhandled collaborator failure
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind
    #[inline]
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadParameter => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::NotUnique => 409,
            Self::Internal => 500,
        }
    }

    /// HTTP reason phrase for this kind
    #[inline]
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadParameter => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Not Found",
            Self::NotUnique => "Conflict",
            Self::Internal => "Internal Server Error",
        }
    }
}

/// Error body returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// HTTP reason phrase
    pub status: String,
    /// Caller-facing message
    pub message: String,
}

impl CoordinatorError {
    /// Project not found
    #[inline]
    #[must_use]
    pub fn project_not_found() -> Self {
        Self::NotFound { entity: "project" }
    }

    /// Project name already taken
    #[inline]
    #[must_use]
    pub fn project_name_taken() -> Self {
        Self::NotUnique {
            entity: "project",
            field: "name",
        }
    }

    /// Rejected name
    #[inline]
    #[must_use]
    pub fn bad_name(error: &NameError) -> Self {
        Self::BadParameter {
            parameter: "name",
            reason: error.to_string(),
        }
    }

    /// Classify a store failure at `step`
    #[must_use]
    pub fn from_store(step: Step, source: StoreError) -> Self {
        match source {
            StoreError::Conflict { field: "name", .. } => Self::project_name_taken(),
            source => Self::Store { step, source },
        }
    }

    /// Mapper for `map_err` on store calls
    #[inline]
    pub fn store_at(step: Step) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::from_store(step, source)
    }

    /// Mapper for `map_err` on cluster calls
    #[inline]
    pub fn cluster_at(step: Step) -> impl FnOnce(ClusterError) -> Self {
        move |source| Self::Cluster { step, source }
    }

    /// Classification of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadParameter { .. } => ErrorKind::BadParameter,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotUnique { .. } => ErrorKind::NotUnique,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Store { .. } | Self::Cluster { .. } => ErrorKind::Internal,
        }
    }

    /// Lifecycle step of a collaborator failure
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Store { step, .. } | Self::Cluster { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// HTTP status code
    #[inline]
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.kind().http_status()
    }

    /// Body for API callers; internal causes are not exposed
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let kind = self.kind();
        let message = match self {
            Self::BadParameter { parameter, .. } => format!("Bad {parameter} parameter"),
            Self::NotFound { entity } => format!("{} not found", capitalize(entity)),
            Self::NotUnique { entity, field } => {
                format!("{} {field} is already in use", capitalize(entity))
            }
            Self::Unauthorized => "Access denied".to_string(),
            Self::Store { .. } | Self::Cluster { .. } => kind.reason().to_string(),
        };
        ErrorResponse {
            code: kind.http_status(),
            status: kind.reason().to_string(),
            message,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
