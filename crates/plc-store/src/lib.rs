//! PLC Store
//!
//! Metadata repository contract for project, volume and service records,
//! plus an in-memory backend.
//!
//! Every owner-scoped operation takes an explicit [`OwnerScope`]. Backends
//! filter by owner at the storage layer: a record that belongs to another
//! owner is indistinguishable from a missing one.
//!
//! # Example
//!
//! ```rust
//! use plc_model::{OwnerId, ProjectDraft, Session};
//! use plc_store::{MemoryStore, ProjectRepository};
//!
//! # async fn example() -> Result<(), plc_store::StoreError> {
//! let store = MemoryStore::new();
//! let session = Session::new(OwnerId::new(), "alice");
//!
//! let project = store.insert(ProjectDraft::new(session.owner, "web", "")).await?;
//! assert!(store.exists_by_name(&session.scope(), "web").await?);
//! assert_eq!(store.get_by_id(&session.scope(), project.id).await?, Some(project));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::{MemoryStore, StoreOp};
pub use repository::{ProjectRepository, ServiceRepository, VolumeRepository};

#[doc(no_inline)]
pub use plc_model::OwnerScope;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
