//! Integration tests for property compilation against live objects.

mod helpers;

use cmisbridge_core::error::ErrorKind;
use cmisbridge_core::types::{Properties, PropertyData, VersioningState};

#[tokio::test]
async fn test_readonly_rejection_is_all_or_nothing() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let bag = helpers::report_properties("alice").with_boolean("bridge:reviewed", true);
    let err = root
        .create_document("r.txt", "bridge:report", &bag, None, VersioningState::Major)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
    assert!(err.message.contains("bridge:reviewed"));

    // Nothing was written: the folder stays empty and the path resolves
    // to nothing.
    let mut children = root.children().await.unwrap();
    assert!(children.next().await.unwrap().is_none());
    assert!(repo.object_by_path("/r.txt").await.is_err());
}

#[tokio::test]
async fn test_required_property_backfilled_from_default() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::Major,
        )
        .await
        .unwrap();

    let props = doc.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:status"), Some("draft"));
    assert_eq!(props.string_value("bridge:author"), Some("alice"));
}

#[tokio::test]
async fn test_required_property_without_default_fails() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let err = root
        .create_document(
            "r.txt",
            "bridge:report",
            &Properties::new(),
            None,
            VersioningState::Major,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
    assert!(err.message.contains("bridge:author"));
}

#[tokio::test]
async fn test_unknown_property_rejected() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let bag = helpers::report_properties("alice").with_string("bridge:bogus", "x");
    let err = root
        .create_document("r.txt", "bridge:report", &bag, None, VersioningState::Major)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
    assert!(err.message.contains("bridge:bogus"));
}

#[tokio::test]
async fn test_explicitly_empty_value_rejected() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let mut bag = helpers::report_properties("alice");
    bag.insert(PropertyData::empty("bridge:pageCount"));
    let err = root
        .create_document("r.txt", "bridge:report", &bag, None, VersioningState::Major)
        .await
        .unwrap_err();
    assert!(err.message.contains("must not be empty"));
}

#[tokio::test]
async fn test_unknown_type_is_not_found() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let err = root
        .create_document(
            "r.txt",
            "bridge:missing",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::TypeNotFound);
}

#[tokio::test]
async fn test_update_overlay_applies_readwrite_only() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::Major,
        )
        .await
        .unwrap();

    // Read-write overlay is applied.
    doc.update_properties(&Properties::new().with_integer("bridge:pageCount", 12))
        .await
        .unwrap();
    let props = doc.properties(None).await.unwrap();
    assert_eq!(
        props.get("bridge:pageCount").and_then(|p| p.first()),
        Some(&cmisbridge_core::types::PropertyValue::Integer(12))
    );

    // Readonly stays rejected on update, and the failed overlay does not
    // touch the previously applied state.
    let err = doc
        .update_properties(&Properties::new().with_boolean("bridge:reviewed", true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
    let props = doc.properties(None).await.unwrap();
    assert!(props.get("bridge:reviewed").is_none());
}
