//! Integration tests for the client runtime: loopback navigation and the
//! defensive checks against structurally broken repository answers.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use cmisbridge_client::{Binding, LocalBinding, ObjectEnvelope, ObjectParentData, Session};
use cmisbridge_core::CmisError;
use cmisbridge_core::error::ErrorKind;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{
    AllowableActions, BaseType, Properties, PropertyData, PropertyValue, VersioningState,
};

async fn loopback_session() -> Session {
    let repo = helpers::build_repository().await;
    let root = helpers::root(&repo).await;
    let folder = root
        .create_folder("reports", "cmis:folder", &Properties::new())
        .await
        .unwrap();
    folder
        .create_document(
            "q1.txt",
            "bridge:report",
            &helpers::report_properties("alice"),
            None,
            VersioningState::Major,
        )
        .await
        .unwrap();
    Session::new(Arc::new(LocalBinding::new(repo, "test-repo")))
}

#[tokio::test]
async fn test_navigation_parents_and_paths() {
    let session = loopback_session().await;

    let root = session.root().await.unwrap();
    let folders = session.children(root.object_id()).await.unwrap();
    assert_eq!(folders.len(), 1);

    let docs = session.children(folders[0].object_id()).await.unwrap();
    let doc = session.object(docs[0].object_id()).await.unwrap();

    let parents = doc.parents().await.unwrap();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].name(), "reports");

    assert_eq!(doc.paths().await.unwrap(), vec!["/reports/q1.txt"]);
}

#[tokio::test]
async fn test_client_move_between_folders() {
    let session = loopback_session().await;

    let root = session.root().await.unwrap();
    let reports_id = session.children(root.object_id()).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc_id = session.children(&reports_id).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc = session.object(&doc_id).await.unwrap();

    let moved = doc.move_to(&reports_id, root.object_id()).await.unwrap();
    assert_eq!(moved.paths().await.unwrap(), vec!["/q1.txt"]);
}

#[tokio::test]
async fn test_client_move_requires_folder_ids() {
    let session = loopback_session().await;
    let root = session.root().await.unwrap();

    let err = root.move_to("", "[root]").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(err.message.contains("Source folder id"));

    let err = root.move_to("[root]", "").await.unwrap_err();
    assert!(err.message.contains("Target folder id"));
}

#[tokio::test]
async fn test_client_move_rejects_wrong_source_folder() {
    let session = loopback_session().await;
    let root = session.root().await.unwrap();
    let reports_id = session.children(root.object_id()).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc_id = session.children(&reports_id).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc = session.object(&doc_id).await.unwrap();

    // The declared source must be the actual parent.
    let err = doc
        .move_to(root.object_id(), root.object_id())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_multi_filing_is_not_supported_locally() {
    let session = loopback_session().await;
    let root = session.root().await.unwrap();
    let reports_id = session.children(root.object_id()).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc_id = session.children(&reports_id).await.unwrap()[0]
        .object_id()
        .to_string();
    let doc = session.object(&doc_id).await.unwrap();

    let err = doc.add_to_folder("[root]", false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotSupported);
    let err = doc.remove_from_folder(&reports_id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotSupported);

    // Empty folder ids are caught before the binding is even asked.
    let err = doc.add_to_folder("", false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

/// A binding that answers with structurally broken parent data, standing in
/// for a misbehaving remote repository.
#[derive(Debug)]
struct FaultyBinding {
    /// Which flavor of broken answer `object_parents` returns.
    fault: Fault,
}

#[derive(Debug, Clone, Copy)]
enum Fault {
    MissingObjectId,
    ParentIsNotAFolder,
    MissingPathProperty,
    MissingPathSegment,
}

fn envelope(base_type: BaseType, with_id: bool, with_path: bool) -> ObjectEnvelope {
    let mut properties = Properties::new();
    if with_id {
        properties.insert(PropertyData::single(
            property_ids::OBJECT_ID,
            PropertyValue::Id("fault-parent".to_string()),
        ));
    }
    if with_path {
        properties.insert(PropertyData::single(
            property_ids::PATH,
            PropertyValue::String("/parent".to_string()),
        ));
    }
    ObjectEnvelope {
        object_id: "fault-parent".to_string(),
        type_id: base_type.type_id().to_string(),
        base_type,
        name: "parent".to_string(),
        properties,
        allowable_actions: AllowableActions::new(),
    }
}

#[async_trait]
impl Binding for FaultyBinding {
    fn repository_id(&self) -> &str {
        "faulty"
    }

    async fn object_by_id(&self, object_id: &str) -> CmisResult<ObjectEnvelope> {
        let base = match self.fault {
            Fault::ParentIsNotAFolder => BaseType::Document,
            _ => BaseType::Folder,
        };
        let mut env = envelope(base, true, true);
        env.object_id = object_id.to_string();
        Ok(env)
    }

    async fn update_properties(
        &self,
        _object_id: &str,
        _properties: &Properties,
    ) -> CmisResult<ObjectEnvelope> {
        Err(CmisError::not_supported("not under test"))
    }

    async fn move_object(
        &self,
        _object_id: &str,
        _source_folder_id: &str,
        _target_folder_id: &str,
    ) -> CmisResult<String> {
        Err(CmisError::not_supported("not under test"))
    }

    async fn delete_object(&self, _object_id: &str, _all_versions: bool) -> CmisResult<()> {
        Err(CmisError::not_supported("not under test"))
    }

    async fn children(&self, _folder_id: &str) -> CmisResult<Vec<ObjectEnvelope>> {
        Ok(Vec::new())
    }

    async fn object_parents(&self, _object_id: &str) -> CmisResult<Vec<ObjectParentData>> {
        let parent = match self.fault {
            Fault::MissingObjectId => ObjectParentData {
                object: envelope(BaseType::Folder, false, true),
                relative_path_segment: Some("child".to_string()),
            },
            Fault::ParentIsNotAFolder => ObjectParentData {
                object: envelope(BaseType::Folder, true, true),
                relative_path_segment: Some("child".to_string()),
            },
            Fault::MissingPathProperty => ObjectParentData {
                object: envelope(BaseType::Folder, true, false),
                relative_path_segment: Some("child".to_string()),
            },
            Fault::MissingPathSegment => ObjectParentData {
                object: envelope(BaseType::Folder, true, true),
                relative_path_segment: None,
            },
        };
        Ok(vec![parent])
    }

    async fn add_object_to_folder(
        &self,
        _object_id: &str,
        _folder_id: &str,
        _all_versions: bool,
    ) -> CmisResult<()> {
        Err(CmisError::not_supported("not under test"))
    }

    async fn remove_object_from_folder(
        &self,
        _object_id: &str,
        _folder_id: &str,
    ) -> CmisResult<()> {
        Err(CmisError::not_supported("not under test"))
    }
}

async fn faulty_object(fault: Fault) -> cmisbridge_client::ClientObject {
    let session = Session::new(Arc::new(FaultyBinding { fault }));
    session.object("child").await.unwrap()
}

#[tokio::test]
async fn test_parent_without_object_id_is_repository_data_error() {
    let object = faulty_object(Fault::MissingObjectId).await;
    let err = object.parents().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RepositoryData);
    assert!(err.message.contains("No object id"));
}

#[tokio::test]
async fn test_parent_that_is_not_a_folder_is_repository_data_error() {
    let object = faulty_object(Fault::ParentIsNotAFolder).await;
    let err = object.parents().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RepositoryData);
    assert!(err.message.contains("not a folder"));
}

#[tokio::test]
async fn test_parent_without_path_property_is_repository_data_error() {
    let object = faulty_object(Fault::MissingPathProperty).await;
    let err = object.paths().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RepositoryData);
    assert!(err.message.contains("No path property"));
}

#[tokio::test]
async fn test_parent_without_path_segment_is_repository_data_error() {
    let object = faulty_object(Fault::MissingPathSegment).await;
    let err = object.paths().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RepositoryData);
    assert!(err.message.contains("No relative path segment"));
}

#[tokio::test]
async fn test_paths_join_tolerates_trailing_separator_from_repository() {
    // A repository reporting the root path "/" must not produce "//child".
    #[derive(Debug)]
    struct RootParentBinding;

    #[async_trait]
    impl Binding for RootParentBinding {
        fn repository_id(&self) -> &str {
            "root-parent"
        }

        async fn object_by_id(&self, object_id: &str) -> CmisResult<ObjectEnvelope> {
            let mut env = envelope(BaseType::Folder, true, true);
            env.object_id = object_id.to_string();
            Ok(env)
        }

        async fn update_properties(
            &self,
            _object_id: &str,
            _properties: &Properties,
        ) -> CmisResult<ObjectEnvelope> {
            Err(CmisError::not_supported("not under test"))
        }

        async fn move_object(
            &self,
            _object_id: &str,
            _source_folder_id: &str,
            _target_folder_id: &str,
        ) -> CmisResult<String> {
            Err(CmisError::not_supported("not under test"))
        }

        async fn delete_object(&self, _object_id: &str, _all_versions: bool) -> CmisResult<()> {
            Err(CmisError::not_supported("not under test"))
        }

        async fn children(&self, _folder_id: &str) -> CmisResult<Vec<ObjectEnvelope>> {
            Ok(Vec::new())
        }

        async fn object_parents(
            &self,
            _object_id: &str,
        ) -> CmisResult<Vec<ObjectParentData>> {
            let mut object = envelope(BaseType::Folder, true, false);
            object.properties.insert(PropertyData::single(
                property_ids::PATH,
                PropertyValue::String("/".to_string()),
            ));
            Ok(vec![ObjectParentData {
                object,
                relative_path_segment: Some("child".to_string()),
            }])
        }

        async fn add_object_to_folder(
            &self,
            _object_id: &str,
            _folder_id: &str,
            _all_versions: bool,
        ) -> CmisResult<()> {
            Err(CmisError::not_supported("not under test"))
        }

        async fn remove_object_from_folder(
            &self,
            _object_id: &str,
            _folder_id: &str,
        ) -> CmisResult<()> {
            Err(CmisError::not_supported("not under test"))
        }
    }

    let session = Session::new(Arc::new(RootParentBinding));
    let object = session.object("child").await.unwrap();
    assert_eq!(object.paths().await.unwrap(), vec!["/child"]);
}
