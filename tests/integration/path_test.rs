//! Integration tests for path mapping and root identity.

mod helpers;

use std::sync::Arc;

use cmisbridge_adapter::{PathManager, Repository, TypeManager};
use cmisbridge_core::config::RepositoryConfig;
use cmisbridge_core::error::ErrorKind;
use cmisbridge_core::traits::{ContentStore, NodeKind};
use cmisbridge_core::types::Properties;
use cmisbridge_store::MemoryStore;

#[test]
fn test_join_is_associative_and_never_doubles_separators() {
    let segments = [
        ("a", "b", "c"),
        ("/a", "b", "c"),
        ("/a/", "b/", "c"),
        ("/", "b", "c"),
    ];
    for (a, b, c) in segments {
        let left = PathManager::join(&PathManager::join(a, b), c);
        let right = PathManager::join(a, &PathManager::join(b, c));
        assert_eq!(left, right, "join not associative for {a:?} {b:?} {c:?}");
        assert!(!left.contains("//"), "doubled separator in {left:?}");
    }
}

#[tokio::test]
async fn test_root_object_id_is_reserved_and_store_independent() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    assert_eq!(root.object_id().to_string(), "[root]");
    // The native identity never leaks through the protocol-visible id.
    assert!(!root.object_id().to_string().contains(&root.id().to_string()));
    assert_eq!(root.path().unwrap(), "/");
}

#[tokio::test]
async fn test_root_parent_resolution() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let err = root.parent().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let folder = root
        .create_folder("child", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let parent = folder.parent().await.unwrap();
    assert!(parent.is_root());
    assert_eq!(parent.object_id().to_string(), "[root]");
}

#[tokio::test]
async fn test_nested_mount_maps_paths_both_ways() {
    // Prepare a store whose repository lives below /content.
    let store = Arc::new(MemoryStore::new());
    let store_root = store.root().await.unwrap();
    store
        .create_node(&store_root.id, "content", NodeKind::Folder)
        .await
        .unwrap();

    let config = RepositoryConfig {
        mount_path: "/content".to_string(),
        ..RepositoryConfig::default()
    };
    let repo = Repository::new(store.clone(), TypeManager::new(), &config).unwrap();

    let root = repo.root_folder().await.unwrap();
    assert!(root.is_root());
    assert_eq!(root.object_id().to_string(), "[root]");
    assert_eq!(root.path().unwrap(), "/");

    let folder = root
        .create_folder("a", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    // CMIS-side path hides the mount; the store sees the full path.
    assert_eq!(folder.path().unwrap(), "/a");
    assert_eq!(folder.node().path, "/content/a");
    assert_eq!(
        repo.object_by_path("/a").await.unwrap().id(),
        folder.id()
    );

    // A node outside the mount has no CMIS path.
    let outside = store
        .create_node(&store_root.id, "elsewhere", NodeKind::Folder)
        .await
        .unwrap();
    let err = repo.paths().to_cmis_path(&outside.path).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFiled);
}

#[tokio::test]
async fn test_unmounted_repository_fails_with_configuration_error() {
    let store = Arc::new(MemoryStore::new());
    let config = RepositoryConfig {
        mount_path: "/missing".to_string(),
        ..RepositoryConfig::default()
    };
    let repo = Repository::new(store, TypeManager::new(), &config).unwrap();
    let err = repo.root_folder().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[tokio::test]
async fn test_deep_paths_resolve_exactly() {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;

    let a = root
        .create_folder("a", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let b = a
        .create_folder("b", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    let c = b
        .create_folder("c", "cmis:folder", &Properties::new())
        .await
        .unwrap();

    assert_eq!(c.path().unwrap(), "/a/b/c");
    assert_eq!(repo.object_by_path("/a/b/c").await.unwrap().id(), c.id());
    assert!(repo.object_by_path("/a/b/missing").await.is_err());
}
