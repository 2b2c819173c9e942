//! Base node adapter.
//!
//! A [`CmisObject`] wraps exactly one store node for the duration of one
//! logical operation. Subtype-specific behavior (folder vs. document) is
//! a closed set of tagged variants dispatched explicitly; the base
//! implementation supplies the object-independent parts and each variant
//! layers its own on top.

pub mod document;
pub mod folder;

use std::collections::BTreeSet;

use tracing::info;

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{AttributeValue, NodeRecord};
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{
    Action, AllowableActions, BaseType, NodeId, ObjectId, Properties, ROOT_OBJECT_ID,
    VersionState,
};

use crate::convert;
use crate::object::document::DocumentAdapter;
use crate::object::folder::FolderAdapter;
use crate::property::{ContentFacts, ExtractFacts, VersionFacts};
use crate::repository::Repository;

/// The closed set of object variants the adapter layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A cmis:folder object.
    Folder,
    /// A cmis:document object (versionable or not).
    Document,
}

/// Request-scoped wrapper around one store node.
#[derive(Debug, Clone)]
pub struct CmisObject {
    pub(crate) repo: Repository,
    pub(crate) node: NodeRecord,
    pub(crate) kind: ObjectKind,
    /// Set when the object id addressed one frozen version.
    pub(crate) version_label: Option<String>,
}

impl CmisObject {
    /// The wrapped node snapshot.
    pub fn node(&self) -> &NodeRecord {
        &self.node
    }

    /// The native node identity.
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    /// The variant this object dispatches as.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// The node name.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Whether this object is the repository root.
    pub fn is_root(&self) -> bool {
        self.repo.paths.is_root(&self.node)
    }

    /// The protocol-visible object id. The root reports the reserved id,
    /// never its native node identity.
    pub fn object_id(&self) -> ObjectId {
        if self.is_root() {
            ObjectId::Root
        } else {
            match &self.version_label {
                Some(label) => ObjectId::Version(self.node.id, label.clone()),
                None => ObjectId::Node(self.node.id),
            }
        }
    }

    /// The CMIS logical path of this object.
    pub fn path(&self) -> CmisResult<String> {
        self.repo.paths.to_cmis_path(&self.node.path)
    }

    /// The resolved type id, read from the node's type marker attribute or
    /// defaulting to the base type.
    pub async fn type_id(&self) -> CmisResult<String> {
        let attributes = self.repo.store.attributes(self.id()).await?;
        type_id_from_attributes(&attributes, self.kind)
    }

    /// Narrow to the folder variant.
    pub fn as_folder(self) -> CmisResult<FolderAdapter> {
        match self.kind {
            ObjectKind::Folder => Ok(FolderAdapter::new(self)),
            ObjectKind::Document => Err(CmisError::invalid_argument(format!(
                "Object '{}' is not a folder",
                self.object_id()
            ))),
        }
    }

    /// Narrow to the document variant.
    pub fn as_document(self) -> CmisResult<DocumentAdapter> {
        match self.kind {
            ObjectKind::Document => Ok(DocumentAdapter::new(self)),
            ObjectKind::Folder => Err(CmisError::invalid_argument(format!(
                "Object '{}' is not a document",
                self.object_id()
            ))),
        }
    }

    /// The compiled property set, optionally narrowed by a filter of
    /// property ids.
    pub async fn properties(
        &self,
        filter: Option<&BTreeSet<String>>,
    ) -> CmisResult<Properties> {
        let attributes = self.repo.store.attributes(self.id()).await?;
        let type_id = type_id_from_attributes(&attributes, self.kind)?;

        let cmis_path = match self.kind {
            ObjectKind::Folder => Some(self.path()?),
            ObjectKind::Document => None,
        };

        let parent_object_id = match (self.kind, self.is_root(), self.node.parent) {
            (ObjectKind::Folder, false, Some(parent_id)) => {
                let parent = self.repo.store.node_by_id(&parent_id).await?;
                Some(if self.repo.paths.is_root(&parent) {
                    ROOT_OBJECT_ID.to_string()
                } else {
                    parent.id.to_string()
                })
            }
            _ => None,
        };

        let version = self.version_facts().await?;
        let content = match self.kind {
            ObjectKind::Document => {
                let content = self.repo.store.content(self.id()).await?;
                Some(ContentFacts {
                    length: content.len() as u64,
                    mime_type: content.mime_type,
                })
            }
            ObjectKind::Folder => None,
        };

        let facts = ExtractFacts {
            node: &self.node,
            object_id: self.object_id().to_string(),
            type_id: &type_id,
            cmis_path,
            parent_object_id,
            version,
            content,
        };
        self.repo.compiler.extract(&facts, &attributes, filter)
    }

    /// The capability set this object exposes, computed per variant and
    /// per node state.
    pub async fn allowable_actions(&self) -> CmisResult<AllowableActions> {
        let mut actions = AllowableActions::new();
        let root = self.is_root();

        // Object-independent base set.
        actions.set(Action::CanGetProperties, true);
        actions.set(Action::CanUpdateProperties, true);
        actions.set(Action::CanDelete, !root);
        actions.set(Action::CanMoveObject, !root);

        match self.kind {
            ObjectKind::Folder => {
                actions.set(Action::CanGetChildren, true);
                actions.set(Action::CanGetDescendants, true);
                actions.set(Action::CanGetFolderTree, true);
                actions.set(Action::CanCreateDocument, true);
                actions.set(Action::CanCreateFolder, true);
                actions.set(Action::CanDeleteTree, true);
                actions.set(Action::CanGetFolderParent, !root);
                actions.set(Action::CanGetObjectParents, !root);
            }
            ObjectKind::Document => {
                let state = self.version_state().await?;
                actions.set(Action::CanGetObjectParents, true);
                actions.set(Action::CanGetContentStream, true);
                actions.set(
                    Action::CanSetContentStream,
                    state != VersionState::CheckedIn,
                );
                actions.set(
                    Action::CanGetAllVersions,
                    state != VersionState::Unversioned,
                );
                actions.set(Action::CanCheckOut, state == VersionState::CheckedIn);
                actions.set(Action::CanCheckIn, state == VersionState::CheckedOut);
                actions.set(
                    Action::CanCancelCheckOut,
                    state == VersionState::CheckedOut,
                );
            }
        }
        Ok(actions)
    }

    /// The parent folder. Fails with a not-filed error when the node has
    /// no parent and is not the root; the root itself has no parent by
    /// definition.
    pub async fn parent(&self) -> CmisResult<FolderAdapter> {
        if self.is_root() {
            return Err(CmisError::invalid_argument(
                "The root folder has no parent",
            ));
        }
        let parent_id = self.node.parent.ok_or_else(|| {
            CmisError::not_filed(format!(
                "Object '{}' has no parent and is not the root",
                self.object_id()
            ))
        })?;
        let record = self.repo.store.node_by_id(&parent_id).await?;
        self.repo.wrap(record).as_folder()
    }

    /// Apply a property overlay with update semantics: supplied
    /// properties only, no required backfill.
    pub async fn update_properties(&self, properties: &Properties) -> CmisResult<()> {
        let type_id = self.type_id().await?;
        let mut writes = self.repo.compiler.compile_update(&type_id, properties)?;
        writes.push((
            convert::attribute_key(property_ids::LAST_MODIFIED_BY),
            AttributeValue::String(self.repo.ctx.user.clone()),
        ));
        self.repo.store.set_attributes(self.id(), writes).await?;
        self.repo.store.save().await?;
        info!(object = %self.object_id(), "Updated properties");
        Ok(())
    }

    /// Re-file this object under another folder.
    pub async fn move_to(&self, target: &FolderAdapter) -> CmisResult<CmisObject> {
        if self.is_root() {
            return Err(CmisError::invalid_argument(
                "The root folder cannot be moved",
            ));
        }
        let record = self
            .repo
            .store
            .move_node(self.id(), target.id())
            .await?;
        self.repo.store.save().await?;
        info!(object = %self.object_id(), target = %target.object_id(), "Moved object");
        Ok(self.repo.wrap(record))
    }

    /// Delete this object. Folders refuse when non-empty; documents honor
    /// the all-versions and PWC flags.
    pub async fn delete(&self, all_versions: bool, is_pwc: bool) -> CmisResult<()> {
        match self.kind {
            ObjectKind::Folder => folder::delete_folder(self, all_versions, is_pwc).await,
            ObjectKind::Document => document::delete_document(self, all_versions, is_pwc).await,
        }
    }

    /// Object-independent delete: remove the single node.
    pub(crate) async fn base_delete(&self) -> CmisResult<()> {
        if self.is_root() {
            return Err(CmisError::constraint(
                "The root folder cannot be deleted",
            ));
        }
        self.repo.store.remove_node(self.id()).await?;
        self.repo.store.save().await?;
        info!(object = %self.object_id(), "Deleted object");
        Ok(())
    }

    /// The versioning state of this object's series.
    pub(crate) async fn version_state(&self) -> CmisResult<VersionState> {
        if !self.node.versionable {
            return Ok(VersionState::Unversioned);
        }
        if self.repo.store.is_checked_out(self.id()).await? {
            Ok(VersionState::CheckedOut)
        } else {
            Ok(VersionState::CheckedIn)
        }
    }

    async fn version_facts(&self) -> CmisResult<Option<VersionFacts>> {
        if self.kind != ObjectKind::Document || !self.node.versionable {
            return Ok(None);
        }
        let state = self.version_state().await?;
        let versions = self.repo.store.versions(self.id()).await?;
        let latest = versions.last();
        let facts = match &self.version_label {
            Some(label) => {
                let addressed = versions
                    .iter()
                    .find(|v| &v.label == label)
                    .ok_or_else(|| {
                        CmisError::object_not_found(format!(
                            "Version '{label}' of object '{}' does not exist",
                            self.node.id
                        ))
                    })?;
                VersionFacts {
                    state,
                    label: Some(addressed.label.clone()),
                    checkin_comment: addressed.comment.clone(),
                    is_latest: latest.map(|v| v.label == addressed.label).unwrap_or(false),
                }
            }
            None => VersionFacts {
                state,
                label: latest.map(|v| v.label.clone()),
                checkin_comment: latest.and_then(|v| v.comment.clone()),
                is_latest: true,
            },
        };
        Ok(Some(facts))
    }
}

/// Read the type marker attribute, defaulting to the base type id.
fn type_id_from_attributes(
    attributes: &std::collections::BTreeMap<String, AttributeValue>,
    kind: ObjectKind,
) -> CmisResult<String> {
    let key = convert::attribute_key(property_ids::OBJECT_TYPE_ID);
    match attributes.get(&key) {
        Some(AttributeValue::String(type_id)) => Ok(type_id.clone()),
        Some(other) => Err(CmisError::repository_data(format!(
            "Stored type marker has an unexpected shape: {other:?}"
        ))),
        None => Ok(match kind {
            ObjectKind::Folder => BaseType::Folder,
            ObjectKind::Document => BaseType::Document,
        }
        .type_id()
        .to_string()),
    }
}
