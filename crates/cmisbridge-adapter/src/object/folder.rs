//! Folder adapter: child enumeration, document/folder creation, and tree
//! deletion.

use std::collections::VecDeque;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{AttributeValue, ContentData, NodeKind, NodeRecord};
use cmisbridge_core::types::property_ids;
use cmisbridge_core::types::{BaseType, Properties, VersioningState};

use crate::convert;
use crate::object::document::DocumentAdapter;
use crate::object::{CmisObject, ObjectKind};
use crate::property::AttributeWrites;
use crate::repository::Repository;

/// Comment stamped on the synthetic check-in that finalizes a document
/// created with a major or minor versioning state.
const AUTO_CHECKIN_COMMENT: &str = "auto checkin";

/// Outcome of a tree deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTreeResult {
    /// Object ids removed by the native subtree operation.
    pub succeeded_ids: Vec<String>,
    /// Object ids that could not be removed. Either empty, or exactly the
    /// folder's own id when the native operation failed as a whole.
    pub failed_ids: Vec<String>,
}

impl DeleteTreeResult {
    /// Whether every targeted object was removed.
    pub fn is_complete(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// One-shot cursor over a folder's children.
///
/// Reflects a live store iteration: it is not restartable, and children
/// created in the checked-out state that were never checked in are
/// filtered out.
pub struct ChildCursor {
    repo: Repository,
    pending: VecDeque<NodeRecord>,
}

impl ChildCursor {
    /// The next visible child, or `None` once the cursor is exhausted.
    pub async fn next(&mut self) -> CmisResult<Option<CmisObject>> {
        while let Some(record) = self.pending.pop_front() {
            if record.versionable {
                let checked_out = self.repo.store.is_checked_out(&record.id).await?;
                let versions = self.repo.store.version_count(&record.id).await?;
                if checked_out && versions == 0 {
                    // Created with a check-out versioning state and never
                    // checked in; invisible until the first check-in.
                    continue;
                }
            }
            return Ok(Some(self.repo.wrap(record)));
        }
        Ok(None)
    }

    /// Drain the cursor into a vector.
    pub async fn collect_all(mut self) -> CmisResult<Vec<CmisObject>> {
        let mut out = Vec::new();
        while let Some(object) = self.next().await? {
            out.push(object);
        }
        Ok(out)
    }
}

/// Adapter over a folder node.
#[derive(Debug, Clone)]
pub struct FolderAdapter {
    object: CmisObject,
}

impl Deref for FolderAdapter {
    type Target = CmisObject;

    fn deref(&self) -> &Self::Target {
        &self.object
    }
}

impl FolderAdapter {
    pub(crate) fn new(object: CmisObject) -> Self {
        Self { object }
    }

    /// The underlying base adapter.
    pub fn as_object(&self) -> &CmisObject {
        &self.object
    }

    /// Unwrap into the base adapter.
    pub fn into_object(self) -> CmisObject {
        self.object
    }

    /// Enumerate the visible children of this folder.
    pub async fn children(&self) -> CmisResult<ChildCursor> {
        let records = self.repo.store.children(self.id()).await?;
        Ok(ChildCursor {
            repo: self.repo.clone(),
            pending: records.into(),
        })
    }

    /// Create a document in this folder.
    ///
    /// The versioning mixin is applied only when `versioning_state` is not
    /// `None`. An absent content stream still binds an empty content
    /// marker so the node is structurally valid. Major/minor states check
    /// the brand-new private working copy in immediately; the checked-out
    /// state returns the node still as the PWC.
    pub async fn create_document(
        &self,
        name: &str,
        type_id: &str,
        properties: &Properties,
        content: Option<ContentData>,
        versioning_state: VersioningState,
    ) -> CmisResult<DocumentAdapter> {
        let type_def = self.repo.types.resolve(type_id)?;
        if type_def.base != BaseType::Document {
            return Err(CmisError::constraint(format!(
                "Type '{type_id}' is not a document type"
            )));
        }
        if versioning_state != VersioningState::None && !type_def.versionable {
            return Err(CmisError::constraint(format!(
                "Type '{type_id}' is not versionable"
            )));
        }

        // Compile the properties before the first store write so a
        // constraint failure cannot leave a half-written node behind.
        let bag = creation_bag(name, type_id, properties)?;
        let mut writes = system_stamp(type_id, &self.repo.ctx.user);
        writes.extend(self.repo.compiler.compile_create(type_id, &bag)?);

        let record = self
            .repo
            .store
            .create_node(self.id(), name, NodeKind::File)
            .await?;
        if versioning_state != VersioningState::None {
            self.repo.store.mark_versionable(&record.id).await?;
        }
        self.repo.store.set_attributes(&record.id, writes).await?;
        self.repo
            .store
            .set_content(&record.id, content.unwrap_or_else(ContentData::empty))
            .await?;
        self.repo.store.save().await?;

        match versioning_state {
            VersioningState::Major | VersioningState::Minor => {
                self.repo
                    .store
                    .checkin(
                        &record.id,
                        Some(AUTO_CHECKIN_COMMENT),
                        versioning_state == VersioningState::Major,
                        &self.repo.ctx.user,
                    )
                    .await?;
                self.repo.store.save().await?;
            }
            VersioningState::None | VersioningState::CheckedOut => {}
        }

        let record = self.repo.store.node_by_id(&record.id).await?;
        info!(
            folder = %self.object_id(),
            name,
            type_id,
            state = %versioning_state,
            "Created document"
        );
        self.repo.wrap(record).as_document()
    }

    /// Create a document by copying an existing one into this folder,
    /// then overlaying only the explicitly supplied properties. Copy
    /// semantics differ from create semantics: no required-property
    /// backfill runs.
    pub async fn create_document_from_source(
        &self,
        source: &DocumentAdapter,
        properties: Option<&Properties>,
    ) -> CmisResult<DocumentAdapter> {
        let record = self
            .repo
            .store
            .copy_subtree(source.id(), self.id(), source.name())
            .await?;

        if let Some(props) = properties {
            if !props.is_empty() {
                let copy = self.repo.wrap(record.clone());
                let type_id = copy.type_id().await?;
                let mut writes = self.repo.compiler.compile_update(&type_id, props)?;
                writes.push((
                    convert::attribute_key(property_ids::LAST_MODIFIED_BY),
                    AttributeValue::String(self.repo.ctx.user.clone()),
                ));
                self.repo.store.set_attributes(&record.id, writes).await?;
            }
        }
        self.repo.store.save().await?;

        let record = self.repo.store.node_by_id(&record.id).await?;
        info!(
            folder = %self.object_id(),
            source = %source.object_id(),
            "Created document from source"
        );
        self.repo.wrap(record).as_document()
    }

    /// Create a subfolder. Same compiler pass as documents, no versioning
    /// concerns.
    pub async fn create_folder(
        &self,
        name: &str,
        type_id: &str,
        properties: &Properties,
    ) -> CmisResult<FolderAdapter> {
        let type_def = self.repo.types.resolve(type_id)?;
        if type_def.base != BaseType::Folder {
            return Err(CmisError::constraint(format!(
                "Type '{type_id}' is not a folder type"
            )));
        }

        let bag = creation_bag(name, type_id, properties)?;
        let mut writes = system_stamp(type_id, &self.repo.ctx.user);
        writes.extend(self.repo.compiler.compile_create(type_id, &bag)?);

        let record = self
            .repo
            .store
            .create_node(self.id(), name, NodeKind::Folder)
            .await?;
        self.repo.store.set_attributes(&record.id, writes).await?;
        self.repo.store.save().await?;

        let record = self.repo.store.node_by_id(&record.id).await?;
        info!(folder = %self.object_id(), name, type_id, "Created folder");
        self.repo.wrap(record).as_folder()
    }

    /// Remove this folder and every descendant in one native operation.
    /// Best-effort: on failure the folder's own id is reported as failed
    /// and the tree is left untouched.
    pub async fn delete_tree(&self) -> CmisResult<DeleteTreeResult> {
        let own_id = self.object_id().to_string();
        match self.repo.store.remove_subtree(self.id()).await {
            Ok(removed) => {
                self.repo.store.save().await?;
                info!(folder = %own_id, count = removed.len(), "Deleted tree");
                Ok(DeleteTreeResult {
                    succeeded_ids: removed.iter().map(ToString::to_string).collect(),
                    failed_ids: Vec::new(),
                })
            }
            Err(err) => {
                debug!(folder = %own_id, error = %err, "Tree delete failed");
                Ok(DeleteTreeResult {
                    succeeded_ids: Vec::new(),
                    failed_ids: vec![own_id],
                })
            }
        }
    }
}

/// Folder-variant delete: refuse when any child exists, then fall back to
/// the base behavior. The emptiness check looks at raw store children, so
/// hidden never-checked-in documents still block deletion.
pub(crate) async fn delete_folder(
    object: &CmisObject,
    _all_versions: bool,
    _is_pwc: bool,
) -> CmisResult<()> {
    debug_assert_eq!(object.kind(), ObjectKind::Folder);
    if !object.repo.store.children(object.id()).await?.is_empty() {
        return Err(CmisError::constraint("Folder is not empty!"));
    }
    object.base_delete().await
}

/// Seed the creation property bag: the explicit `name` argument and the
/// selected type id are folded in unless the caller supplied them, and a
/// caller-supplied type id must agree with the selected one.
fn creation_bag(name: &str, type_id: &str, properties: &Properties) -> CmisResult<Properties> {
    if name.trim().is_empty() {
        return Err(CmisError::invalid_argument("Name must be set!"));
    }
    let mut bag = properties.clone();
    if !bag.contains(property_ids::NAME) {
        bag = bag.with_string(property_ids::NAME, name);
    }
    match bag.string_value(property_ids::OBJECT_TYPE_ID) {
        Some(supplied) if supplied != type_id => {
            return Err(CmisError::invalid_argument(format!(
                "Supplied type id '{supplied}' does not match '{type_id}'"
            )));
        }
        Some(_) => {}
        None => bag = bag.with_id(property_ids::OBJECT_TYPE_ID, type_id),
    }
    Ok(bag)
}

/// Native attributes stamped by the adapter itself on every new object:
/// the type marker and the creating user attribution.
fn system_stamp(type_id: &str, user: &str) -> AttributeWrites {
    vec![
        (
            convert::attribute_key(property_ids::OBJECT_TYPE_ID),
            AttributeValue::String(type_id.to_string()),
        ),
        (
            convert::attribute_key(property_ids::CREATED_BY),
            AttributeValue::String(user.to_string()),
        ),
        (
            convert::attribute_key(property_ids::LAST_MODIFIED_BY),
            AttributeValue::String(user.to_string()),
        ),
    ]
}
