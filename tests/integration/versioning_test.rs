//! Integration tests for the check-out/check-in/cancel state machine.

mod helpers;

use bytes::Bytes;
use cmisbridge_adapter::CancelOutcome;
use cmisbridge_core::error::ErrorKind;
use cmisbridge_core::traits::ContentData;
use cmisbridge_core::types::{Properties, VersionState, VersioningState};

#[tokio::test]
async fn test_create_major_lands_checked_in_with_one_version() {
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

    assert_eq!(doc.state().await.unwrap(), VersionState::CheckedIn);
    let versions = doc.versions().await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].label, "1.0");
    assert!(versions[0].major);
    assert_eq!(versions[0].comment.as_deref(), Some("auto checkin"));

    // The supplied property value is retained.
    let props = doc.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:author"), Some("alice"));
}

#[tokio::test]
async fn test_create_checked_out_then_checkin_with_comment() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::CheckedOut,
        )
        .await
        .unwrap();
    assert_eq!(doc.state().await.unwrap(), VersionState::CheckedOut);
    assert!(doc.versions().await.unwrap().is_empty());

    let record = doc.checkin(Some("c1"), None, true).await.unwrap();
    assert_eq!(record.comment.as_deref(), Some("c1"));

    // The PWC no longer exists and the new version carries the comment.
    assert_eq!(doc.state().await.unwrap(), VersionState::CheckedIn);
    let versions = doc.versions().await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].comment.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_double_checkout_fails() {
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

    doc.checkout().await.unwrap();
    let err = doc.checkout().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Versioning);
}

#[tokio::test]
async fn test_cancel_checkout_restores_pre_checkout_state() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            Some(ContentData::new("text/plain", Bytes::from("original"))),
            VersioningState::Major,
        )
        .await
        .unwrap();

    doc.checkout().await.unwrap();
    doc.update_properties(&Properties::new().with_string("bridge:author", "mallory"))
        .await
        .unwrap();
    doc.set_content(ContentData::new("text/plain", Bytes::from("scratch")))
        .await
        .unwrap();

    let outcome = doc.cancel_checkout().await.unwrap();
    assert_eq!(outcome, CancelOutcome::Restored);
    assert_eq!(doc.state().await.unwrap(), VersionState::CheckedIn);

    // Exactly the pre-checkout values are back.
    let props = doc.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:author"), Some("alice"));
    assert_eq!(doc.content().await.unwrap().data, Bytes::from("original"));
}

#[tokio::test]
async fn test_cancel_on_never_checked_in_series_deletes_document() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "wip.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::CheckedOut,
        )
        .await
        .unwrap();

    let outcome = doc.cancel_checkout().await.unwrap();
    assert_eq!(outcome, CancelOutcome::SeriesDeleted);
    assert!(repo.object_by_path("/wip.txt").await.is_err());
}

#[tokio::test]
async fn test_version_labels_advance_major_and_minor() {
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

    doc.checkout().await.unwrap();
    doc.checkin(Some("minor edit"), None, false).await.unwrap();
    doc.checkout().await.unwrap();
    doc.checkin(Some("major rework"), None, true).await.unwrap();

    let labels: Vec<String> = doc
        .versions()
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.label)
        .collect();
    assert_eq!(labels, vec!["1.0", "1.1", "2.0"]);
}

#[tokio::test]
async fn test_checkin_property_overlay_is_applied_before_commit() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::CheckedOut,
        )
        .await
        .unwrap();

    doc.checkin(
        Some("c1"),
        Some(&Properties::new().with_string("bridge:status", "final")),
        true,
    )
    .await
    .unwrap();

    let props = doc.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:status"), Some("final"));

    // The overlay is part of the frozen version: cancel after a fresh
    // checkout restores it.
    doc.checkout().await.unwrap();
    doc.update_properties(&Properties::new().with_string("bridge:status", "scratch"))
        .await
        .unwrap();
    doc.cancel_checkout().await.unwrap();
    let props = doc.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:status"), Some("final"));
}

#[tokio::test]
async fn test_unversioned_document_has_no_state_machine() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "n.txt",
            "bridge:note",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap();

    assert_eq!(doc.state().await.unwrap(), VersionState::Unversioned);
    let err = doc.checkout().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Versioning);
}

#[tokio::test]
async fn test_versioning_state_on_non_versionable_type_is_rejected() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let err = root
        .create_document(
            "n.txt",
            "bridge:note",
            &Properties::new(),
            None,
            VersioningState::Major,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
}

#[tokio::test]
async fn test_delete_pwc_flag_cancels_checkout() {
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

    doc.checkout().await.unwrap();
    doc.delete(false, true).await.unwrap();

    // The series survives; only the working copy is gone.
    assert_eq!(doc.state().await.unwrap(), VersionState::CheckedIn);
    assert!(repo.object_by_path("/r.txt").await.is_ok());

    // Deleting without the PWC flag removes the whole series.
    doc.delete(true, false).await.unwrap();
    assert!(repo.object_by_path("/r.txt").await.is_err());
}
