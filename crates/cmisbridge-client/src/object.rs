//! Fileable client objects.
//!
//! A remote repository is a semi-trusted peer: every answer that feeds a
//! navigation decision is validated, and a structurally broken answer is a
//! repository-data error rather than silently wrong navigation.

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{
    AllowableActions, BaseType, Properties, PropertyData, PropertyValue,
};

use crate::binding::ObjectEnvelope;
use crate::session::Session;

/// A fileable object fetched through a session.
#[derive(Debug, Clone)]
pub struct ClientObject {
    session: Session,
    envelope: ObjectEnvelope,
}

impl ClientObject {
    pub(crate) fn new(session: Session, envelope: ObjectEnvelope) -> Self {
        Self { session, envelope }
    }

    /// The protocol-visible object id.
    pub fn object_id(&self) -> &str {
        &self.envelope.object_id
    }

    /// The object name.
    pub fn name(&self) -> &str {
        &self.envelope.name
    }

    /// The resolved type id.
    pub fn type_id(&self) -> &str {
        &self.envelope.type_id
    }

    /// The base type.
    pub fn base_type(&self) -> BaseType {
        self.envelope.base_type
    }

    /// Whether this object is a folder.
    pub fn is_folder(&self) -> bool {
        self.envelope.base_type == BaseType::Folder
    }

    /// The full envelope.
    pub fn envelope(&self) -> &ObjectEnvelope {
        &self.envelope
    }

    /// One property of the compiled set.
    pub fn property(&self, id: &str) -> Option<&PropertyData> {
        self.envelope.properties.get(id)
    }

    /// The capability set.
    pub fn allowable_actions(&self) -> &AllowableActions {
        &self.envelope.allowable_actions
    }

    /// Re-fetch this object's current state.
    pub async fn refresh(&self) -> CmisResult<ClientObject> {
        self.session.object(self.object_id()).await
    }

    /// The parent folders of this object.
    pub async fn parents(&self) -> CmisResult<Vec<ClientObject>> {
        let provider_parents = self
            .session
            .binding()
            .object_parents(self.object_id())
            .await?;

        let mut parents = Vec::with_capacity(provider_parents.len());
        for parent_data in provider_parents {
            // Pull the id property out of the parent envelope; anything
            // else means the repository sent invalid data.
            let id_property = parent_data
                .object
                .properties
                .get(property_ids::OBJECT_ID)
                .ok_or_else(|| {
                    CmisError::repository_data("Repository sent invalid data! No object id!")
                })?;
            let parent_id = match id_property.first() {
                Some(PropertyValue::Id(id)) => id.clone(),
                _ => {
                    return Err(CmisError::repository_data(
                        "Repository sent invalid data! No object id!",
                    ));
                }
            };

            // Fetch the object and make sure it is a folder.
            let parent = self.session.object(&parent_id).await?;
            if !parent.is_folder() {
                return Err(CmisError::repository_data(
                    "Repository sent invalid data! Object is not a folder!",
                ));
            }
            parents.push(parent);
        }
        Ok(parents)
    }

    /// Every path this object is reachable under, one per parent.
    pub async fn paths(&self) -> CmisResult<Vec<String>> {
        let provider_parents = self
            .session
            .binding()
            .object_parents(self.object_id())
            .await?;

        let mut paths = Vec::with_capacity(provider_parents.len());
        for parent_data in provider_parents {
            let path_property = parent_data
                .object
                .properties
                .get(property_ids::PATH)
                .ok_or_else(|| {
                    CmisError::repository_data("Repository sent invalid data! No path property!")
                })?;
            let folder_path = match path_property.first() {
                Some(PropertyValue::String(path)) => path.clone(),
                _ => {
                    return Err(CmisError::repository_data(
                        "Repository sent invalid data! No path property!",
                    ));
                }
            };
            let segment = parent_data.relative_path_segment.ok_or_else(|| {
                CmisError::repository_data(
                    "Repository sent invalid data! No relative path segment!",
                )
            })?;

            // Exactly one separator regardless of a trailing one on the
            // folder path.
            let path = if folder_path.ends_with('/') {
                format!("{folder_path}{segment}")
            } else {
                format!("{folder_path}/{segment}")
            };
            paths.push(path);
        }
        Ok(paths)
    }

    /// Move this object from one folder to another and return the moved
    /// object.
    pub async fn move_to(
        &self,
        source_folder_id: &str,
        target_folder_id: &str,
    ) -> CmisResult<ClientObject> {
        if source_folder_id.is_empty() {
            return Err(CmisError::invalid_argument("Source folder id must be set!"));
        }
        if target_folder_id.is_empty() {
            return Err(CmisError::invalid_argument("Target folder id must be set!"));
        }
        let moved_id = self
            .session
            .binding()
            .move_object(self.object_id(), source_folder_id, target_folder_id)
            .await?;
        self.session.object(&moved_id).await
    }

    /// File this object into an additional folder.
    pub async fn add_to_folder(&self, folder_id: &str, all_versions: bool) -> CmisResult<()> {
        if folder_id.is_empty() {
            return Err(CmisError::invalid_argument("Folder id must be set!"));
        }
        self.session
            .binding()
            .add_object_to_folder(self.object_id(), folder_id, all_versions)
            .await
    }

    /// Remove this object from one of its folders.
    pub async fn remove_from_folder(&self, folder_id: &str) -> CmisResult<()> {
        if folder_id.is_empty() {
            return Err(CmisError::invalid_argument("Folder id must be set!"));
        }
        self.session
            .binding()
            .remove_object_from_folder(self.object_id(), folder_id)
            .await
    }

    /// Apply a property overlay and return the refreshed object.
    pub async fn update_properties(&self, properties: &Properties) -> CmisResult<ClientObject> {
        let envelope = self
            .session
            .binding()
            .update_properties(self.object_id(), properties)
            .await?;
        Ok(ClientObject::new(self.session.clone(), envelope))
    }

    /// Delete this object.
    pub async fn delete(&self, all_versions: bool) -> CmisResult<()> {
        self.session
            .binding()
            .delete_object(self.object_id(), all_versions)
            .await
    }
}
