//! Repository entry point and request attribution.
//!
//! The repository is the node factory: every lookup constructs fresh,
//! request-scoped adapter instances over the current store state. The
//! repository itself only holds shared read-only collaborators and is
//! cheap to clone per request.

use std::sync::Arc;

use cmisbridge_core::CmisError;
use cmisbridge_core::config::RepositoryConfig;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::{ContentStore, NodeKind, NodeRecord};
use cmisbridge_core::types::ObjectId;

use crate::object::folder::FolderAdapter;
use crate::object::{CmisObject, ObjectKind};
use crate::path_manager::PathManager;
use crate::property::PropertyCompiler;
use crate::type_manager::TypeManager;

/// Attribution for the current logical operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// User stamped into created-by/modified-by attribution.
    pub user: String,
}

impl RequestContext {
    /// Context for a named user.
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// The fallback system context.
    pub fn system() -> Self {
        Self::new("system")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::system()
    }
}

/// The adapter-layer entry point over one mounted store.
#[derive(Debug, Clone)]
pub struct Repository {
    pub(crate) store: Arc<dyn ContentStore>,
    pub(crate) types: Arc<TypeManager>,
    pub(crate) paths: Arc<PathManager>,
    pub(crate) compiler: PropertyCompiler,
    pub(crate) ctx: RequestContext,
}

impl Repository {
    /// Assemble a repository over a store with a fully registered type
    /// manager.
    pub fn new(
        store: Arc<dyn ContentStore>,
        types: TypeManager,
        config: &RepositoryConfig,
    ) -> CmisResult<Self> {
        let types = Arc::new(types);
        Ok(Self {
            compiler: PropertyCompiler::new(Arc::clone(&types)),
            paths: Arc::new(PathManager::new(&config.mount_path)?),
            ctx: RequestContext::new(config.user.as_str()),
            store,
            types,
        })
    }

    /// A handle attributing subsequent operations to the given user.
    pub fn with_user(&self, user: impl Into<String>) -> Self {
        let mut repo = self.clone();
        repo.ctx = RequestContext::new(user);
        repo
    }

    /// The shared type registry.
    pub fn types(&self) -> &TypeManager {
        &self.types
    }

    /// The shared path manager.
    pub fn paths(&self) -> &PathManager {
        &self.paths
    }

    /// The current request attribution.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// The repository root folder.
    pub async fn root_folder(&self) -> CmisResult<FolderAdapter> {
        let record = self
            .store
            .node_by_path(self.paths.mount_path())
            .await
            .map_err(|err| {
                CmisError::configuration(format!(
                    "Repository mount '{}' cannot be resolved: {err}",
                    self.paths.mount_path()
                ))
            })?;
        self.wrap(record).as_folder()
    }

    /// Resolve a protocol-visible object id to a fresh adapter instance.
    pub async fn object_by_id(&self, id: &ObjectId) -> CmisResult<CmisObject> {
        match id {
            ObjectId::Root => Ok(self.root_folder().await?.into_object()),
            ObjectId::Node(node_id) => {
                let record = self.store.node_by_id(node_id).await?;
                Ok(self.wrap(record))
            }
            ObjectId::Version(node_id, label) => {
                let record = self.store.node_by_id(node_id).await?;
                let versions = self.store.versions(&record.id).await?;
                if !versions.iter().any(|v| &v.label == label) {
                    return Err(CmisError::object_not_found(format!(
                        "Version '{label}' of object '{node_id}' does not exist"
                    )));
                }
                let mut object = self.wrap(record);
                object.version_label = Some(label.clone());
                Ok(object)
            }
        }
    }

    /// Resolve a CMIS logical path to a fresh adapter instance.
    pub async fn object_by_path(&self, cmis_path: &str) -> CmisResult<CmisObject> {
        let store_path = self.paths.to_store_path(cmis_path)?;
        let record = self.store.node_by_path(&store_path).await?;
        Ok(self.wrap(record))
    }

    /// The node-factory step: wrap a store record in the matching adapter
    /// variant.
    pub(crate) fn wrap(&self, node: NodeRecord) -> CmisObject {
        let kind = match node.kind {
            NodeKind::Folder => ObjectKind::Folder,
            NodeKind::File => ObjectKind::Document,
        };
        CmisObject {
            repo: self.clone(),
            node,
            kind,
            version_label: None,
        }
    }
}
