//! The binding abstraction.
//!
//! A binding is the transport-level provider the client runtime talks to:
//! object, navigation, and multi-filing services. The wire format behind
//! it is opaque; the runtime only sees CMIS-shaped envelopes.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cmisbridge_core::result::CmisResult;
use cmisbridge_core::types::{AllowableActions, BaseType, Properties};

/// The CMIS-shaped result of an object lookup: id, type, property set,
/// and allowable actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEnvelope {
    /// Protocol-visible object id.
    pub object_id: String,
    /// Resolved type id.
    pub type_id: String,
    /// Base type of the resolved type.
    pub base_type: BaseType,
    /// Object name.
    pub name: String,
    /// Compiled property set.
    pub properties: Properties,
    /// Capability set.
    pub allowable_actions: AllowableActions,
}

/// One parent of a fileable object, with the child's path segment below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectParentData {
    /// The parent folder envelope.
    pub object: ObjectEnvelope,
    /// The child's name below this parent, used for path composition.
    pub relative_path_segment: Option<String>,
}

/// Transport-level provider of the object, navigation, and multi-filing
/// services.
#[async_trait]
pub trait Binding: Send + Sync + fmt::Debug + 'static {
    /// The id of the repository this binding is connected to.
    fn repository_id(&self) -> &str;

    // --- object service ---

    /// Fetch one object by id.
    async fn object_by_id(&self, object_id: &str) -> CmisResult<ObjectEnvelope>;

    /// Apply a property overlay and return the refreshed envelope.
    async fn update_properties(
        &self,
        object_id: &str,
        properties: &Properties,
    ) -> CmisResult<ObjectEnvelope>;

    /// Move an object between folders; returns the object's id after the
    /// move.
    async fn move_object(
        &self,
        object_id: &str,
        source_folder_id: &str,
        target_folder_id: &str,
    ) -> CmisResult<String>;

    /// Delete one object.
    async fn delete_object(&self, object_id: &str, all_versions: bool) -> CmisResult<()>;

    // --- navigation service ---

    /// The visible children of a folder.
    async fn children(&self, folder_id: &str) -> CmisResult<Vec<ObjectEnvelope>>;

    /// The parents of a fileable object; empty for the root and for
    /// unfiled objects.
    async fn object_parents(&self, object_id: &str) -> CmisResult<Vec<ObjectParentData>>;

    // --- multi-filing service ---

    /// File an object into an additional folder.
    async fn add_object_to_folder(
        &self,
        object_id: &str,
        folder_id: &str,
        all_versions: bool,
    ) -> CmisResult<()>;

    /// Remove an object from one of its folders.
    async fn remove_object_from_folder(
        &self,
        object_id: &str,
        folder_id: &str,
    ) -> CmisResult<()>;
}
