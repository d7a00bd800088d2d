//! PLC Model
//!
//! Records and identifiers shared by the metadata store, the cluster client
//! and the lifecycle coordinator.
//!
//! # Overview
//!
//! - **Identifiers**: [`OwnerId`], [`ProjectId`], [`VolumeId`], [`ServiceId`]
//! - **Sessions**: [`Session`] and the [`OwnerScope`] every store call carries
//! - **Records**: [`Project`], [`Volume`], [`Service`]
//! - **Requests**: [`Reference`], [`NewProject`], [`ProjectPatch`]
//!
//! # Example
//!
//! ```rust
//! use plc_model::{Reference, validate_project_name, DEFAULT_MAX_NAME_LEN};
//!
//! assert!(matches!(Reference::parse("web"), Reference::Name(_)));
//! assert!(validate_project_name("web", DEFAULT_MAX_NAME_LEN).is_ok());
//! ```

#![warn(missing_docs)]

pub mod ids;
pub mod name;
pub mod project;
pub mod reference;
pub mod resources;
pub mod session;

// Re-exports
pub use ids::{OwnerId, ProjectId, ServiceId, VolumeId};
pub use name::{validate_project_name, NameError, DEFAULT_MAX_NAME_LEN, MIN_NAME_LEN};
pub use project::{NewProject, Project, ProjectDraft, ProjectPatch};
pub use reference::Reference;
pub use resources::{Service, Volume};
pub use session::{OwnerScope, Session};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with project records
    pub use crate::{
        NewProject, OwnerId, OwnerScope, Project, ProjectId, ProjectPatch, Reference, Service,
        Session, Volume,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
