//! Path mapping between store-native paths and CMIS logical paths.
//!
//! The repository may be mounted at any store folder; the mount point maps
//! to the CMIS root path `/` and reports the reserved root object id.

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::NodeRecord;

/// Maps paths across the mount boundary and identifies the root node.
#[derive(Debug, Clone)]
pub struct PathManager {
    /// Normalized store path of the CMIS root: `/` or `/segment[/...]`,
    /// never with a trailing separator (except the bare root).
    mount: String,
}

impl PathManager {
    /// Create a path manager mounted at the given store path.
    pub fn new(mount_path: &str) -> CmisResult<Self> {
        if !mount_path.starts_with('/') {
            return Err(CmisError::configuration(format!(
                "Mount path '{mount_path}' must be absolute"
            )));
        }
        let trimmed = mount_path.trim_end_matches('/');
        let mount = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        Ok(Self { mount })
    }

    /// The store-native path the CMIS root is mounted at.
    pub fn mount_path(&self) -> &str {
        &self.mount
    }

    /// Compose a child path from a parent path and a child name with
    /// exactly one separator, regardless of whether the parent already
    /// ends in one.
    pub fn join(parent: &str, child: &str) -> String {
        if parent.ends_with('/') {
            format!("{parent}{child}")
        } else {
            format!("{parent}/{child}")
        }
    }

    /// Translate a CMIS logical path into a store-native path.
    pub fn to_store_path(&self, cmis_path: &str) -> CmisResult<String> {
        if !cmis_path.starts_with('/') {
            return Err(CmisError::invalid_argument(format!(
                "Path '{cmis_path}' must be absolute"
            )));
        }
        let relative = cmis_path.trim_matches('/');
        if relative.is_empty() {
            return Ok(self.mount.clone());
        }
        Ok(Self::join(&self.mount, relative))
    }

    /// Translate a store-native path into a CMIS logical path. Fails with
    /// a not-filed error for paths outside the mounted subtree.
    pub fn to_cmis_path(&self, store_path: &str) -> CmisResult<String> {
        if store_path == self.mount {
            return Ok("/".to_string());
        }
        if self.mount == "/" {
            if store_path.starts_with('/') {
                return Ok(store_path.to_string());
            }
        } else if let Some(rest) = store_path.strip_prefix(&self.mount) {
            if rest.starts_with('/') {
                return Ok(rest.to_string());
            }
        }
        Err(CmisError::not_filed(format!(
            "Path '{store_path}' lies outside the repository mount '{}'",
            self.mount
        )))
    }

    /// Whether the node is the repository root.
    pub fn is_root(&self, node: &NodeRecord) -> bool {
        node.path == self.mount
    }
}
