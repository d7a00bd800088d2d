//! Functional tests for owner isolation.
//!
//! A project of another owner must look exactly like a project that does
//! not exist, whichever way it is addressed, and no operation of one owner
//! may touch another owner's records or cluster resources.

use plc_core::ErrorKind;
use plc_model::{NewProject, ProjectPatch, Reference};
use plc_test_utils::{session, setup_harness};
use pretty_assertions::assert_eq;

/// Tenet: get, update and remove of a foreign project are all NotFound.
#[tokio::test]
async fn foreign_project_is_not_found() {
    let h = setup_harness();
    let alice = session("alice");
    let mallory = session("mallory");
    let project = h.coordinator.create(&alice, NewProject::named("web")).await.unwrap();

    for reference in [Reference::Identifier(project.id), Reference::parse("web")] {
        let get = h.coordinator.get(&mallory, &reference).await.unwrap_err();
        assert_eq!(get.kind(), ErrorKind::NotFound);

        let update = h
            .coordinator
            .update(&mallory, &reference, ProjectPatch::new().with_description("pwned"))
            .await
            .unwrap_err();
        assert_eq!(update.kind(), ErrorKind::NotFound);

        let remove = h.coordinator.remove(&mallory, &reference).await.unwrap_err();
        assert_eq!(remove.kind(), ErrorKind::NotFound);
    }

    // Only alice's create reached the cluster.
    assert_eq!(h.cluster.calls().len(), 1);
    assert!(h.cluster.has_namespace(&project.id.namespace_name()));
    let stored = h.coordinator.get(&alice, &Reference::parse("web")).await.unwrap();
    assert_eq!(stored.description, "");
}

/// Tenet: names are unique per owner, not globally.
#[tokio::test]
async fn owners_may_share_names() {
    let h = setup_harness();
    let alice = session("alice");
    let bob = session("bob");

    let a = h.coordinator.create(&alice, NewProject::named("web")).await.unwrap();
    let b = h.coordinator.create(&bob, NewProject::named("web")).await.unwrap();

    assert_ne!(a.id, b.id);
    let resolved = h.coordinator.get(&bob, &Reference::parse("web")).await.unwrap();
    assert_eq!(resolved.id, b.id);
    assert_eq!(
        h.cluster
            .namespace_labels(&b.id.namespace_name())
            .unwrap()
            .get("user")
            .map(String::as_str),
        Some("bob")
    );
}

/// Tenet: remove only deletes the caller's services of the project.
#[tokio::test]
async fn remove_keeps_services_of_other_owners() {
    let h = setup_harness();
    let alice = session("alice");
    let bob = session("bob");
    let project = h.coordinator.create(&alice, NewProject::named("web")).await.unwrap();
    h.seed_service(&alice, project.id, "frontend").await;
    h.seed_service(&bob, project.id, "sidecar").await;

    let report = h
        .coordinator
        .remove(&alice, &Reference::Identifier(project.id))
        .await
        .unwrap();

    assert_eq!(report.services_removed, 1);
    assert_eq!(h.store.service_count(), 1);
}

/// Tenet: identifier-shaped text is looked up as an identifier.
#[tokio::test]
async fn identifier_text_resolves_as_identifier() {
    let h = setup_harness();
    let alice = session("alice");
    let project = h.coordinator.create(&alice, NewProject::named("web")).await.unwrap();

    let reference = Reference::parse(&project.id.to_string());
    assert!(reference.is_identifier());
    let found = h.coordinator.get(&alice, &reference).await.unwrap();
    assert_eq!(found.id, project.id);
}
