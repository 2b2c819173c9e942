//! In-process binding over the adapter layer.
//!
//! Lets the client runtime drive a locally mounted repository without any
//! wire transport. The underlying store files every node exactly once, so
//! the multi-filing service is not supported here.

use async_trait::async_trait;
use tracing::debug;

use cmisbridge_adapter::{CmisObject, ObjectKind, Repository};
use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::{BaseType, ObjectId, Properties};

use crate::binding::{Binding, ObjectEnvelope, ObjectParentData};

/// Binding that serves a [`Repository`] in-process.
#[derive(Debug)]
pub struct LocalBinding {
    repo: Repository,
    repository_id: String,
}

impl LocalBinding {
    /// Wrap a repository under the given repository id.
    pub fn new(repo: Repository, repository_id: impl Into<String>) -> Self {
        Self {
            repo,
            repository_id: repository_id.into(),
        }
    }

    fn parse(&self, object_id: &str) -> CmisResult<ObjectId> {
        object_id.parse()
    }

    async fn envelope(&self, object: &CmisObject) -> CmisResult<ObjectEnvelope> {
        Ok(ObjectEnvelope {
            object_id: object.object_id().to_string(),
            type_id: object.type_id().await?,
            base_type: match object.kind() {
                ObjectKind::Folder => BaseType::Folder,
                ObjectKind::Document => BaseType::Document,
            },
            name: object.name().to_string(),
            properties: object.properties(None).await?,
            allowable_actions: object.allowable_actions().await?,
        })
    }
}

#[async_trait]
impl Binding for LocalBinding {
    fn repository_id(&self) -> &str {
        &self.repository_id
    }

    async fn object_by_id(&self, object_id: &str) -> CmisResult<ObjectEnvelope> {
        let object = self.repo.object_by_id(&self.parse(object_id)?).await?;
        self.envelope(&object).await
    }

    async fn update_properties(
        &self,
        object_id: &str,
        properties: &Properties,
    ) -> CmisResult<ObjectEnvelope> {
        let object = self.repo.object_by_id(&self.parse(object_id)?).await?;
        object.update_properties(properties).await?;
        let refreshed = self.repo.object_by_id(&self.parse(object_id)?).await?;
        self.envelope(&refreshed).await
    }

    async fn move_object(
        &self,
        object_id: &str,
        source_folder_id: &str,
        target_folder_id: &str,
    ) -> CmisResult<String> {
        let object = self.repo.object_by_id(&self.parse(object_id)?).await?;

        // Single-filed store: the declared source folder must be the
        // object's actual parent.
        let parent = object.parent().await?;
        if parent.object_id().to_string() != source_folder_id {
            return Err(CmisError::invalid_argument(format!(
                "Folder '{source_folder_id}' is not a parent of object '{object_id}'"
            )));
        }

        let target = self
            .repo
            .object_by_id(&self.parse(target_folder_id)?)
            .await?
            .as_folder()?;
        let moved = object.move_to(&target).await?;
        debug!(object = %object_id, target = %target_folder_id, "Moved via local binding");
        Ok(moved.object_id().to_string())
    }

    async fn delete_object(&self, object_id: &str, all_versions: bool) -> CmisResult<()> {
        let object = self.repo.object_by_id(&self.parse(object_id)?).await?;
        object.delete(all_versions, false).await
    }

    async fn children(&self, folder_id: &str) -> CmisResult<Vec<ObjectEnvelope>> {
        let folder = self
            .repo
            .object_by_id(&self.parse(folder_id)?)
            .await?
            .as_folder()?;
        let mut cursor = folder.children().await?;
        let mut envelopes = Vec::new();
        while let Some(child) = cursor.next().await? {
            envelopes.push(self.envelope(&child).await?);
        }
        Ok(envelopes)
    }

    async fn object_parents(&self, object_id: &str) -> CmisResult<Vec<ObjectParentData>> {
        let object = self.repo.object_by_id(&self.parse(object_id)?).await?;
        if object.is_root() {
            return Ok(Vec::new());
        }
        match object.parent().await {
            Ok(parent) => Ok(vec![ObjectParentData {
                object: self.envelope(parent.as_object()).await?,
                relative_path_segment: Some(object.name().to_string()),
            }]),
            Err(err) if err.kind == cmisbridge_core::error::ErrorKind::NotFiled => {
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    async fn add_object_to_folder(
        &self,
        _object_id: &str,
        _folder_id: &str,
        _all_versions: bool,
    ) -> CmisResult<()> {
        Err(CmisError::not_supported(
            "Multi-filing is not supported by this repository",
        ))
    }

    async fn remove_object_from_folder(
        &self,
        _object_id: &str,
        _folder_id: &str,
    ) -> CmisResult<()> {
        Err(CmisError::not_supported(
            "Multi-filing is not supported by this repository",
        ))
    }
}
