//! Integration tests for folder operations: child visibility, deletion
//! rules, and creation flows.

mod helpers;

use bytes::Bytes;
use cmisbridge_core::error::ErrorKind;
use cmisbridge_core::traits::ContentData;
use cmisbridge_core::types::{Properties, VersioningState};

#[tokio::test]
async fn test_checked_out_document_invisible_until_first_checkin() {
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

    // The node exists but the listing filters it out.
    assert!(repo.object_by_path("/wip.txt").await.is_ok());
    let visible = root.children().await.unwrap().collect_all().await.unwrap();
    assert!(visible.is_empty());

    // First check-in makes it visible.
    doc.checkin(Some("c1"), None, true).await.unwrap();
    let visible = root.children().await.unwrap().collect_all().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name(), "wip.txt");
}

#[tokio::test]
async fn test_non_empty_folder_rejects_single_delete_but_not_tree_delete() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let folder = root
        .create_folder("projects", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    folder
        .create_document(
            "a.txt",
            "cmis:document",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap();

    let err = folder.delete(false, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
    assert!(err.message.contains("not empty"));

    let result = folder.delete_tree().await.unwrap();
    assert!(result.is_complete());
    assert_eq!(result.succeeded_ids.len(), 2);

    let err = repo.object_by_path("/projects").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ObjectNotFound);
}

#[tokio::test]
async fn test_hidden_checked_out_child_still_blocks_single_delete() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let folder = root
        .create_folder("stash", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    folder
        .create_document(
            "wip.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::CheckedOut,
        )
        .await
        .unwrap();

    // Invisible to the listing, but the folder is not empty.
    assert!(
        folder
            .children()
            .await
            .unwrap()
            .collect_all()
            .await
            .unwrap()
            .is_empty()
    );
    let err = folder.delete(false, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
}

#[tokio::test]
async fn test_empty_folder_single_delete_succeeds() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let folder = root
        .create_folder("empty", "bridge:case", &Properties::new())
        .await
        .unwrap();
    folder.delete(false, false).await.unwrap();
    assert!(repo.object_by_path("/empty").await.is_err());
}

#[tokio::test]
async fn test_create_document_from_source_overlays_supplied_properties_only() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let source_folder = root
        .create_folder("a", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let target_folder = root
        .create_folder("b", "cmis:folder", &Properties::new())
        .await
        .unwrap();

    let source = source_folder
        .create_document(
            "r.txt",
            "bridge:report",
            &helpers::report_properties("alice").with_integer("bridge:pageCount", 4),
            Some(ContentData::new("text/plain", Bytes::from("body"))),
            VersioningState::Major,
        )
        .await
        .unwrap();

    let copy = target_folder
        .create_document_from_source(
            &source,
            Some(&Properties::new().with_string("bridge:author", "bob")),
        )
        .await
        .unwrap();

    // Overlay replaced only what was supplied; everything else carried
    // over from the source node, and no backfill pass ran.
    let props = copy.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:author"), Some("bob"));
    assert_eq!(props.string_value("bridge:status"), Some("draft"));
    assert_eq!(copy.name(), "r.txt");
    assert_eq!(copy.content().await.unwrap().data, Bytes::from("body"));
    assert_eq!(copy.path().unwrap(), "/b/r.txt");

    // The source is untouched.
    let props = source.properties(None).await.unwrap();
    assert_eq!(props.string_value("bridge:author"), Some("alice"));
}

#[tokio::test]
async fn test_absent_content_stream_still_binds_empty_marker() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let doc = root
        .create_document(
            "empty.txt",
            "bridge:note",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap();

    let content = doc.content().await.unwrap();
    assert!(content.is_empty());
    assert!(content.mime_type.is_none());

    let props = doc.properties(None).await.unwrap();
    assert_eq!(
        props
            .get("cmis:contentStreamLength")
            .and_then(|p| p.first()),
        Some(&cmisbridge_core::types::PropertyValue::Integer(0))
    );
}

#[tokio::test]
async fn test_base_type_mismatch_is_rejected() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let err = root
        .create_document(
            "x",
            "cmis:folder",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);

    let err = root
        .create_folder("y", "bridge:note", &Properties::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Constraint);
}

#[tokio::test]
async fn test_move_between_folders() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let a = root
        .create_folder("a", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let b = root
        .create_folder("b", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let doc = a
        .create_document(
            "doc.txt",
            "cmis:document",
            &Properties::new(),
            None,
            VersioningState::None,
        )
        .await
        .unwrap();

    let moved = doc.move_to(&b).await.unwrap();
    assert_eq!(moved.path().unwrap(), "/b/doc.txt");
    assert!(repo.object_by_path("/a/doc.txt").await.is_err());
    assert!(repo.object_by_path("/b/doc.txt").await.is_ok());
}
