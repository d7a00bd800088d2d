//! Per-owner name uniqueness
//!
//! The check here is read-then-write: two requests can both observe a name
//! as free. Backends that enforce (owner, name) as a unique key close that
//! window, and their conflict surfaces as the same `NotUnique` error.

use crate::error::{CoordinatorError, Step};
use plc_model::OwnerScope;
use plc_store::ProjectRepository;
use std::sync::Arc;

/// Checks that a name is free within an owner scope
#[derive(Clone)]
pub struct UniquenessGuard {
    projects: Arc<dyn ProjectRepository>,
}

impl UniquenessGuard {
    /// Create new guard
    #[inline]
    #[must_use]
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Whether the owner already has a project named `name`
    ///
    /// # Errors
    /// `CoordinatorError::Store` if the lookup fails.
    pub async fn exists(&self, scope: &OwnerScope, name: &str) -> Result<bool, CoordinatorError> {
        self.projects
            .exists_by_name(scope, name)
            .await
            .map_err(CoordinatorError::store_at(Step::CheckName))
    }

    /// Fail unless `name` is free
    ///
    /// # Errors
    /// `CoordinatorError::NotUnique` if taken.
    pub async fn ensure_available(
        &self,
        scope: &OwnerScope,
        name: &str,
    ) -> Result<(), CoordinatorError> {
        if self.exists(scope, name).await? {
            tracing::debug!(%scope, name, "project name taken");
            return Err(CoordinatorError::project_name_taken());
        }
        Ok(())
    }
}

impl std::fmt::Debug for UniquenessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniquenessGuard").finish_non_exhaustive()
    }
}
