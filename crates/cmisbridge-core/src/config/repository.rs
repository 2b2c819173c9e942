//! Repository configuration.

use serde::{Deserialize, Serialize};

/// Settings for one exposed repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Protocol-visible repository id.
    #[serde(default = "default_id")]
    pub id: String,
    /// Human-readable repository name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Store-native path the repository root is mounted at.
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
    /// User name stamped into created-by/modified-by attribution when no
    /// caller context is supplied.
    #[serde(default = "default_user")]
    pub user: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            id: default_id(),
            name: default_name(),
            mount_path: default_mount_path(),
            user: default_user(),
        }
    }
}

fn default_id() -> String {
    "cmisbridge".to_string()
}

fn default_name() -> String {
    "CmisBridge Repository".to_string()
}

fn default_mount_path() -> String {
    "/".to_string()
}

fn default_user() -> String {
    "system".to_string()
}
