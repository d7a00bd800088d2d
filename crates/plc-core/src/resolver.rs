//! Identifier resolution
//!
//! Turns a [`Reference`] into the canonical project record visible in the
//! caller's owner scope. Identifier references are looked up by id, names by
//! (owner, name); both are filtered by owner in the store, so a project of
//! another owner resolves to `NotFound` either way.

use crate::error::{CoordinatorError, Step};
use plc_model::{OwnerScope, Project, Reference};
use plc_store::ProjectRepository;
use std::sync::Arc;

/// Resolves references against the project repository
#[derive(Clone)]
pub struct IdentifierResolver {
    projects: Arc<dyn ProjectRepository>,
}

impl IdentifierResolver {
    /// Create new resolver
    #[inline]
    #[must_use]
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Resolve a reference to its record
    ///
    /// # Errors
    /// - `CoordinatorError::NotFound` if nothing matches within `scope`
    /// - `CoordinatorError::Store` if the lookup fails
    pub async fn resolve(
        &self,
        scope: &OwnerScope,
        reference: &Reference,
    ) -> Result<Project, CoordinatorError> {
        let found = match reference {
            Reference::Identifier(id) => self.projects.get_by_id(scope, *id).await,
            Reference::Name(name) => self.projects.get_by_name(scope, name).await,
        }
        .map_err(CoordinatorError::store_at(Step::ResolveReference))?;

        found.ok_or_else(|| {
            tracing::debug!(%scope, %reference, "reference did not resolve");
            CoordinatorError::project_not_found()
        })
    }
}

impl std::fmt::Debug for IdentifierResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use plc_model::{OwnerId, ProjectDraft, Session};
    use plc_store::{MemoryStore, StoreOp};

    async fn setup() -> (Arc<MemoryStore>, IdentifierResolver, Session, Project) {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(OwnerId::new(), "alice");
        let project = store
            .insert(ProjectDraft::new(session.owner, "web", ""))
            .await
            .unwrap();
        let resolver = IdentifierResolver::new(store.clone());
        (store, resolver, session, project)
    }

    #[tokio::test]
    async fn resolves_by_name_and_identifier() {
        let (_, resolver, session, project) = setup().await;
        let scope = session.scope();

        let by_name = resolver.resolve(&scope, &Reference::parse("web")).await.unwrap();
        let by_id = resolver
            .resolve(&scope, &Reference::Identifier(project.id))
            .await
            .unwrap();
        assert_eq!(by_name, project);
        assert_eq!(by_id, project);
    }

    #[tokio::test]
    async fn foreign_owner_gets_not_found() {
        let (_, resolver, _, project) = setup().await;
        let stranger = Session::new(OwnerId::new(), "mallory").scope();

        for reference in [Reference::parse("web"), Reference::Identifier(project.id)] {
            let err = resolver.resolve(&stranger, &reference).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn store_failure_is_internal() {
        let (store, resolver, session, _) = setup().await;
        store.inject_fault(StoreOp::GetProject);

        let err = resolver
            .resolve(&session.scope(), &Reference::parse("web"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.step(), Some(Step::ResolveReference));
    }
}
