//! PLC Cluster
//!
//! The contract the lifecycle coordinator holds against the cluster
//! orchestrator, and an in-memory orchestrator that honours it.
//!
//! The orchestrator provisions one namespace per project, named by the
//! project identifier, and persistent volumes addressed by name. Deleting a
//! resource that does not exist reports [`ClusterError::NotFound`].

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod memory;

// Re-exports
pub use client::{ClusterClient, Labels};
pub use error::{ClusterError, ResourceKind};
pub use memory::{ClusterCall, ClusterOp, InMemoryCluster};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
