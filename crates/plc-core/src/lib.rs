//! PLC Core - Project Lifecycle Coordinator
//!
//! Keeps a user's projects consistent across two systems:
//! - the metadata store holding project, volume and service records
//! - the cluster orchestrator holding one namespace per project
//!
//! Every operation runs within the caller's owner scope. A project of
//! another owner is indistinguishable from one that does not exist.
//!
//! # Example
//!
//! ```rust,ignore
//! use plc_cluster::InMemoryCluster;
//! use plc_core::{CoordinatorConfig, ProjectCoordinator, Repositories};
//! use plc_model::{NewProject, OwnerId, Reference, Session};
//! use plc_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = ProjectCoordinator::new(
//!     CoordinatorConfig::new(),
//!     Repositories::shared(Arc::new(MemoryStore::new())),
//!     Arc::new(InMemoryCluster::new()),
//! );
//!
//! let session = Session::new(OwnerId::new(), "alice");
//! let project = coordinator.create(&session, NewProject::named("web")).await?;
//! coordinator.remove(&session, &Reference::Identifier(project.id)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod boundary;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod guard;
pub mod resolver;
pub mod telemetry;

pub use boundary::{authorize, respond, Response};
pub use config::{ConfigError, CoordinatorConfig, CreateFailurePolicy};
pub use coordinator::{ProjectCoordinator, RemovalReport, Repositories};
pub use error::{CoordinatorError, ErrorKind, ErrorResponse, Step};
pub use guard::UniquenessGuard;
pub use resolver::IdentifierResolver;
pub use telemetry::{init_tracing, LogFormat};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the coordinator
    pub use crate::{
        CoordinatorConfig, CoordinatorError, CreateFailurePolicy, ErrorKind, ProjectCoordinator,
        RemovalReport, Repositories,
    };
    pub use plc_model::{NewProject, Project, ProjectPatch, Reference, Session};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
