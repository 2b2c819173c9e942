//! Content-store trait for pluggable hierarchical storage backends.
//!
//! The store is a semi-trusted external dependency: the adapter layer
//! validates what it reads back and wraps every failure in the unified
//! error taxonomy at its own boundary. The [`ContentStore`] trait is
//! defined here in `cmisbridge-core` and implemented in `cmisbridge-store`.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::CmisResult;
use crate::types::id::NodeId;

/// The structural kind of a native node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A container node.
    Folder,
    /// A content-bearing node.
    File,
}

/// A store-native attribute value.
///
/// Attribute keys are store-legal names (no `:`); the adapter's converter
/// maps CMIS property ids and values to and from this representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    /// String payload.
    String(String),
    /// 64-bit integer payload.
    Long(i64),
    /// Floating-point payload.
    Decimal(f64),
    /// Boolean payload.
    Boolean(bool),
    /// UTC timestamp payload.
    DateTime(DateTime<Utc>),
    /// Ordered list of scalar payloads (multi-valued attribute).
    List(Vec<AttributeValue>),
}

/// A snapshot of one node's identity and structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Native node identity.
    pub id: NodeId,
    /// Parent node, absent only for the store root.
    pub parent: Option<NodeId>,
    /// Node name; empty for the store root.
    pub name: String,
    /// Structural kind.
    pub kind: NodeKind,
    /// Absolute store-native path.
    pub path: String,
    /// Whether the native versioning mixin is applied.
    pub versionable: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified_at: DateTime<Utc>,
}

/// One entry of a node's native version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Version label, e.g. `"1.0"`.
    pub label: String,
    /// Whether this is a major version.
    pub major: bool,
    /// Comment supplied at check-in.
    pub comment: Option<String>,
    /// User that performed the check-in.
    pub created_by: String,
    /// Check-in timestamp.
    pub created_at: DateTime<Utc>,
}

/// Binary content bound to a file node.
///
/// Every file node carries a content marker; a document created without a
/// stream still binds an empty one so the node is structurally valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentData {
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// The raw bytes.
    pub data: Bytes,
}

impl ContentData {
    /// Content with a known MIME type.
    pub fn new(mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            mime_type: Some(mime_type.into()),
            data,
        }
    }

    /// The empty content marker.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Trait for hierarchical content-store backends.
///
/// Multi-step adapter sequences call several of these primitives followed
/// by one [`save`](ContentStore::save); the store must make each primitive
/// atomic but is not required to provide isolation across primitives beyond
/// what a single commit provides.
#[async_trait]
pub trait ContentStore: Send + Sync + fmt::Debug + 'static {
    /// The store root node.
    async fn root(&self) -> CmisResult<NodeRecord>;

    /// Look up a node by native identity.
    async fn node_by_id(&self, id: &NodeId) -> CmisResult<NodeRecord>;

    /// Look up a node by absolute store-native path.
    async fn node_by_path(&self, path: &str) -> CmisResult<NodeRecord>;

    /// Direct children of a node, in name order.
    async fn children(&self, id: &NodeId) -> CmisResult<Vec<NodeRecord>>;

    /// Create a child node. Fails if a sibling with the same name exists.
    async fn create_node(
        &self,
        parent: &NodeId,
        name: &str,
        kind: NodeKind,
    ) -> CmisResult<NodeRecord>;

    /// Apply the native versioning mixin. The node starts checked out with
    /// an empty history, mirroring a just-created private working copy.
    async fn mark_versionable(&self, id: &NodeId) -> CmisResult<()>;

    /// All attributes of a node.
    async fn attributes(&self, id: &NodeId) -> CmisResult<BTreeMap<String, AttributeValue>>;

    /// Write one attribute.
    async fn set_attribute(&self, id: &NodeId, key: &str, value: AttributeValue) -> CmisResult<()>;

    /// Write a batch of attributes in one native operation.
    async fn set_attributes(
        &self,
        id: &NodeId,
        writes: Vec<(String, AttributeValue)>,
    ) -> CmisResult<()>;

    /// Read the bound content of a file node.
    async fn content(&self, id: &NodeId) -> CmisResult<ContentData>;

    /// Bind content to a file node, replacing any previous stream.
    async fn set_content(&self, id: &NodeId, content: ContentData) -> CmisResult<()>;

    /// Re-file a node under a new parent. Fails on name collision.
    async fn move_node(&self, id: &NodeId, new_parent: &NodeId) -> CmisResult<NodeRecord>;

    /// Deep-copy a subtree under a new parent with the given name.
    /// The copy gets fresh identities and an empty version history.
    async fn copy_subtree(
        &self,
        source: &NodeId,
        target_parent: &NodeId,
        name: &str,
    ) -> CmisResult<NodeRecord>;

    /// Remove a single node. Fails if the node still has children.
    async fn remove_node(&self, id: &NodeId) -> CmisResult<()>;

    /// Remove a whole subtree in one native operation and return the
    /// removed identities (subtree root included).
    async fn remove_subtree(&self, id: &NodeId) -> CmisResult<Vec<NodeId>>;

    /// Number of checked-in versions of a versionable node.
    async fn version_count(&self, id: &NodeId) -> CmisResult<u32>;

    /// Whether a versionable node is currently checked out.
    async fn is_checked_out(&self, id: &NodeId) -> CmisResult<bool>;

    /// Native check-out primitive.
    async fn checkout(&self, id: &NodeId) -> CmisResult<()>;

    /// Native check-in primitive: freezes the current node state as a new
    /// version and returns its record.
    async fn checkin(
        &self,
        id: &NodeId,
        comment: Option<&str>,
        major: bool,
        created_by: &str,
    ) -> CmisResult<VersionRecord>;

    /// Native cancel primitive: restores the latest checked-in state.
    /// Fails if the history holds no checked-in version to restore.
    async fn cancel_checkout(&self, id: &NodeId) -> CmisResult<()>;

    /// Ordered version history, oldest first.
    async fn versions(&self, id: &NodeId) -> CmisResult<Vec<VersionRecord>>;

    /// Remove one version from a node's history by label.
    /// Fails when the label is unknown or it is the only version.
    async fn remove_version(&self, id: &NodeId, label: &str) -> CmisResult<()>;

    /// Commit the current transaction boundary.
    async fn save(&self) -> CmisResult<()>;
}
