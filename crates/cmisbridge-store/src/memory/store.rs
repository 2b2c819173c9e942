//! In-memory `ContentStore` implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{
    AttributeValue, ContentData, ContentStore, NodeKind, NodeRecord, VersionRecord,
};
use cmisbridge_core::types::NodeId;

use super::versioning::VersionHistory;

/// One node of the in-memory tree.
#[derive(Debug, Clone)]
struct StoredNode {
    id: NodeId,
    parent: Option<NodeId>,
    name: String,
    kind: NodeKind,
    versionable: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    modified_at: chrono::DateTime<chrono::Utc>,
    attributes: BTreeMap<String, AttributeValue>,
    content: Option<ContentData>,
    children: Vec<NodeId>,
    history: Option<VersionHistory>,
}

impl StoredNode {
    fn new(id: NodeId, parent: Option<NodeId>, name: &str, kind: NodeKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            parent,
            name: name.to_string(),
            kind,
            versionable: false,
            created_at: now,
            modified_at: now,
            attributes: BTreeMap::new(),
            content: None,
            children: Vec::new(),
            history: None,
        }
    }
}

#[derive(Debug)]
struct Inner {
    nodes: HashMap<NodeId, StoredNode>,
    root: NodeId,
}

impl Inner {
    fn node(&self, id: &NodeId) -> CmisResult<&StoredNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| CmisError::object_not_found(format!("Node '{id}' does not exist")))
    }

    fn node_mut(&mut self, id: &NodeId) -> CmisResult<&mut StoredNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| CmisError::object_not_found(format!("Node '{id}' does not exist")))
    }

    /// Absolute store-native path, built by walking up to the root.
    fn path_of(&self, id: &NodeId) -> CmisResult<String> {
        let mut segments = Vec::new();
        let mut cursor = *id;
        loop {
            let node = self.node(&cursor)?;
            match node.parent {
                Some(parent) => {
                    segments.push(node.name.clone());
                    cursor = parent;
                }
                None => break,
            }
        }
        if segments.is_empty() {
            return Ok("/".to_string());
        }
        segments.reverse();
        Ok(format!("/{}", segments.join("/")))
    }

    fn record(&self, id: &NodeId) -> CmisResult<NodeRecord> {
        let node = self.node(id)?;
        Ok(NodeRecord {
            id: node.id,
            parent: node.parent,
            name: node.name.clone(),
            kind: node.kind,
            path: self.path_of(id)?,
            versionable: node.versionable,
            created_at: node.created_at,
            modified_at: node.modified_at,
        })
    }

    fn history(&self, id: &NodeId) -> CmisResult<&VersionHistory> {
        self.node(id)?.history.as_ref().ok_or_else(|| {
            CmisError::versioning(format!("Node '{id}' is not versionable"))
        })
    }

    fn history_mut(&mut self, id: &NodeId) -> CmisResult<&mut VersionHistory> {
        self.node_mut(id)?.history.as_mut().ok_or_else(|| {
            CmisError::versioning(format!("Node '{id}' is not versionable"))
        })
    }

    /// Whether `candidate` is `ancestor` or lies below it.
    fn is_in_subtree(&self, ancestor: &NodeId, candidate: &NodeId) -> CmisResult<bool> {
        let mut cursor = Some(*candidate);
        while let Some(id) = cursor {
            if id == *ancestor {
                return Ok(true);
            }
            cursor = self.node(&id)?.parent;
        }
        Ok(false)
    }

    fn ensure_folder(&self, id: &NodeId) -> CmisResult<()> {
        if self.node(id)?.kind != NodeKind::Folder {
            return Err(CmisError::storage(format!("Node '{id}' is not a folder")));
        }
        Ok(())
    }

    fn ensure_no_sibling(&self, parent: &NodeId, name: &str) -> CmisResult<()> {
        let parent_node = self.node(parent)?;
        for child_id in &parent_node.children {
            if self.node(child_id)?.name == name {
                return Err(CmisError::storage(format!(
                    "An item named '{name}' already exists below '{}'",
                    self.path_of(parent)?
                )));
            }
        }
        Ok(())
    }

    fn collect_subtree(&self, id: &NodeId, out: &mut Vec<NodeId>) -> CmisResult<()> {
        let node = self.node(id)?;
        for child in node.children.clone() {
            self.collect_subtree(&child, out)?;
        }
        out.push(*id);
        Ok(())
    }

    fn copy_recursive(
        &mut self,
        source: &NodeId,
        target_parent: &NodeId,
        name: &str,
    ) -> CmisResult<NodeId> {
        let template = self.node(source)?.clone();
        let copy_id = NodeId::new();
        let now = Utc::now();
        let copy = StoredNode {
            id: copy_id,
            parent: Some(*target_parent),
            name: name.to_string(),
            kind: template.kind,
            versionable: template.versionable,
            created_at: now,
            modified_at: now,
            attributes: template.attributes.clone(),
            content: template.content.clone(),
            children: Vec::new(),
            // A copy gets a fresh history in a stable state.
            history: template
                .versionable
                .then(VersionHistory::new_checked_in),
        };
        self.nodes.insert(copy_id, copy);
        self.node_mut(target_parent)?.children.push(copy_id);

        for child_id in template.children {
            let child_name = self.node(&child_id)?.name.clone();
            self.copy_recursive(&child_id, &copy_id, &child_name)?;
        }
        Ok(copy_id)
    }
}

/// In-memory hierarchical content store.
///
/// A single writer lock guards the node table; each trait primitive is one
/// atomic critical section, which is exactly the isolation the adapter
/// layer is allowed to assume.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store containing only the root folder.
    pub fn new() -> Self {
        let root_id = NodeId::new();
        let mut nodes = HashMap::new();
        nodes.insert(
            root_id,
            StoredNode::new(root_id, None, "", NodeKind::Folder),
        );
        Self {
            inner: RwLock::new(Inner {
                nodes,
                root: root_id,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn root(&self) -> CmisResult<NodeRecord> {
        let inner = self.inner.read().await;
        let root = inner.root;
        inner.record(&root)
    }

    async fn node_by_id(&self, id: &NodeId) -> CmisResult<NodeRecord> {
        self.inner.read().await.record(id)
    }

    async fn node_by_path(&self, path: &str) -> CmisResult<NodeRecord> {
        let inner = self.inner.read().await;
        let mut cursor = inner.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = inner.node(&cursor)?;
            let mut found = None;
            for child_id in &node.children {
                if inner.node(child_id)?.name == segment {
                    found = Some(*child_id);
                    break;
                }
            }
            cursor = found.ok_or_else(|| {
                CmisError::object_not_found(format!("No node at path '{path}'"))
            })?;
        }
        inner.record(&cursor)
    }

    async fn children(&self, id: &NodeId) -> CmisResult<Vec<NodeRecord>> {
        let inner = self.inner.read().await;
        inner.ensure_folder(id)?;
        let mut records = Vec::new();
        for child_id in &inner.node(id)?.children {
            records.push(inner.record(child_id)?);
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    async fn create_node(
        &self,
        parent: &NodeId,
        name: &str,
        kind: NodeKind,
    ) -> CmisResult<NodeRecord> {
        if name.is_empty() || name.contains('/') {
            return Err(CmisError::storage(format!("Illegal node name '{name}'")));
        }
        let mut inner = self.inner.write().await;
        inner.ensure_folder(parent)?;
        inner.ensure_no_sibling(parent, name)?;

        let id = NodeId::new();
        inner
            .nodes
            .insert(id, StoredNode::new(id, Some(*parent), name, kind));
        inner.node_mut(parent)?.children.push(id);
        inner.node_mut(parent)?.modified_at = Utc::now();
        debug!(node = %id, name, "Created node");
        inner.record(&id)
    }

    async fn mark_versionable(&self, id: &NodeId) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let node = inner.node_mut(id)?;
        if node.kind != NodeKind::File {
            return Err(CmisError::storage(format!(
                "Node '{id}' is not a file node; only files take the versioning mixin"
            )));
        }
        node.versionable = true;
        node.history = Some(VersionHistory::new_checked_out());
        Ok(())
    }

    async fn attributes(&self, id: &NodeId) -> CmisResult<BTreeMap<String, AttributeValue>> {
        Ok(self.inner.read().await.node(id)?.attributes.clone())
    }

    async fn set_attribute(&self, id: &NodeId, key: &str, value: AttributeValue) -> CmisResult<()> {
        self.set_attributes(id, vec![(key.to_string(), value)]).await
    }

    async fn set_attributes(
        &self,
        id: &NodeId,
        writes: Vec<(String, AttributeValue)>,
    ) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let node = inner.node_mut(id)?;
        for (key, value) in writes {
            if key.contains(':') {
                return Err(CmisError::storage(format!(
                    "Attribute key '{key}' contains an illegal character"
                )));
            }
            node.attributes.insert(key, value);
        }
        node.modified_at = Utc::now();
        Ok(())
    }

    async fn content(&self, id: &NodeId) -> CmisResult<ContentData> {
        let inner = self.inner.read().await;
        let node = inner.node(id)?;
        if node.kind != NodeKind::File {
            return Err(CmisError::storage(format!("Node '{id}' has no content stream")));
        }
        node.content.clone().ok_or_else(|| {
            CmisError::repository_data(format!(
                "File node '{}' has no bound content marker",
                inner.path_of(id).unwrap_or_else(|_| id.to_string())
            ))
        })
    }

    async fn set_content(&self, id: &NodeId, content: ContentData) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let node = inner.node_mut(id)?;
        if node.kind != NodeKind::File {
            return Err(CmisError::storage(format!("Node '{id}' cannot carry content")));
        }
        node.content = Some(content);
        node.modified_at = Utc::now();
        Ok(())
    }

    async fn move_node(&self, id: &NodeId, new_parent: &NodeId) -> CmisResult<NodeRecord> {
        let mut inner = self.inner.write().await;
        inner.ensure_folder(new_parent)?;
        if inner.is_in_subtree(id, new_parent)? {
            return Err(CmisError::storage(
                "Cannot move a node below its own subtree",
            ));
        }
        let (old_parent, name) = {
            let node = inner.node(id)?;
            let parent = node.parent.ok_or_else(|| {
                CmisError::storage("The root node cannot be moved")
            })?;
            (parent, node.name.clone())
        };
        inner.ensure_no_sibling(new_parent, &name)?;

        inner.node_mut(&old_parent)?.children.retain(|c| c != id);
        inner.node_mut(new_parent)?.children.push(*id);
        let node = inner.node_mut(id)?;
        node.parent = Some(*new_parent);
        node.modified_at = Utc::now();
        debug!(node = %id, target = %new_parent, "Moved node");
        inner.record(id)
    }

    async fn copy_subtree(
        &self,
        source: &NodeId,
        target_parent: &NodeId,
        name: &str,
    ) -> CmisResult<NodeRecord> {
        let mut inner = self.inner.write().await;
        inner.ensure_folder(target_parent)?;
        if inner.is_in_subtree(source, target_parent)? {
            return Err(CmisError::storage(
                "Cannot copy a subtree below itself",
            ));
        }
        inner.ensure_no_sibling(target_parent, name)?;
        let copy_id = inner.copy_recursive(source, target_parent, name)?;
        inner.node_mut(target_parent)?.modified_at = Utc::now();
        debug!(source = %source, copy = %copy_id, "Copied subtree");
        inner.record(&copy_id)
    }

    async fn remove_node(&self, id: &NodeId) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let node = inner.node(id)?;
        if !node.children.is_empty() {
            return Err(CmisError::storage(format!(
                "Node '{}' still has children; remove the subtree instead",
                inner.path_of(id)?
            )));
        }
        let parent = node.parent.ok_or_else(|| {
            CmisError::storage("The root node cannot be removed")
        })?;
        inner.node_mut(&parent)?.children.retain(|c| c != id);
        inner.nodes.remove(id);
        debug!(node = %id, "Removed node");
        Ok(())
    }

    async fn remove_subtree(&self, id: &NodeId) -> CmisResult<Vec<NodeId>> {
        let mut inner = self.inner.write().await;
        let parent = inner.node(id)?.parent.ok_or_else(|| {
            CmisError::storage("The root node cannot be removed")
        })?;
        let mut removed = Vec::new();
        inner.collect_subtree(id, &mut removed)?;
        for node_id in &removed {
            inner.nodes.remove(node_id);
        }
        inner.node_mut(&parent)?.children.retain(|c| c != id);
        debug!(node = %id, count = removed.len(), "Removed subtree");
        Ok(removed)
    }

    async fn version_count(&self, id: &NodeId) -> CmisResult<u32> {
        let inner = self.inner.read().await;
        Ok(inner
            .node(id)?
            .history
            .as_ref()
            .map(|h| h.versions.len() as u32)
            .unwrap_or(0))
    }

    async fn is_checked_out(&self, id: &NodeId) -> CmisResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .node(id)?
            .history
            .as_ref()
            .map(|h| h.checked_out)
            .unwrap_or(false))
    }

    async fn checkout(&self, id: &NodeId) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let history = inner.history_mut(id)?;
        if history.checked_out {
            return Err(CmisError::versioning(format!(
                "Node '{id}' is already checked out"
            )));
        }
        history.checked_out = true;
        debug!(node = %id, "Checked out");
        Ok(())
    }

    async fn checkin(
        &self,
        id: &NodeId,
        comment: Option<&str>,
        major: bool,
        created_by: &str,
    ) -> CmisResult<VersionRecord> {
        let mut inner = self.inner.write().await;
        if !inner.history(id)?.checked_out {
            return Err(CmisError::versioning(format!(
                "Node '{id}' is not checked out"
            )));
        }
        let node = inner.node(id)?;
        let attributes = node.attributes.clone();
        let content = node.content.clone();
        let record = inner
            .history_mut(id)?
            .commit(comment, major, created_by, attributes, content);
        inner.node_mut(id)?.modified_at = Utc::now();
        debug!(node = %id, label = %record.label, "Checked in");
        Ok(record)
    }

    async fn cancel_checkout(&self, id: &NodeId) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let history = inner.history(id)?;
        if !history.checked_out {
            return Err(CmisError::versioning(format!(
                "Node '{id}' is not checked out"
            )));
        }
        let snapshot = history.latest().cloned().ok_or_else(|| {
            CmisError::versioning(format!(
                "Node '{id}' has no checked-in version to restore"
            ))
        })?;
        let node = inner.node_mut(id)?;
        node.attributes = snapshot.attributes;
        node.content = snapshot.content;
        node.modified_at = Utc::now();
        if let Some(history) = node.history.as_mut() {
            history.checked_out = false;
        }
        debug!(node = %id, "Cancelled checkout");
        Ok(())
    }

    async fn versions(&self, id: &NodeId) -> CmisResult<Vec<VersionRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .history(id)?
            .versions
            .iter()
            .map(|s| s.record.clone())
            .collect())
    }

    async fn remove_version(&self, id: &NodeId, label: &str) -> CmisResult<()> {
        let mut inner = self.inner.write().await;
        let history = inner.history_mut(id)?;
        let index = history
            .versions
            .iter()
            .position(|s| s.record.label == label)
            .ok_or_else(|| {
                CmisError::versioning(format!("Node '{id}' has no version '{label}'"))
            })?;
        if history.versions.len() == 1 {
            return Err(CmisError::versioning(format!(
                "Version '{label}' is the only version of node '{id}'"
            )));
        }
        history.versions.remove(index);
        debug!(node = %id, label, "Removed version");
        Ok(())
    }

    async fn save(&self) -> CmisResult<()> {
        // Every primitive commits immediately; the transaction boundary is
        // a no-op for this provider.
        debug!("Session saved");
        Ok(())
    }
}
