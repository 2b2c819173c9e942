//! Top-level application configuration.

use serde::{Deserialize, Serialize};

use crate::config::logging::LoggingConfig;
use crate::config::repository::RepositoryConfig;
use crate::result::CmisResult;

/// The full application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repository settings.
    #[serde(default)]
    pub repository: RepositoryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> CmisResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Overlay another configuration on top of this one, section by section.
    pub fn merge(&mut self, other: AppConfig) {
        self.repository = other.repository;
        self.logging = other.logging;
    }
}
