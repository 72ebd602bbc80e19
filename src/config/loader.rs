use std::{collections::HashMap, env, fs, path::{Path, PathBuf}};

use super::{
    container_config::{ContainerConfig, PartialContainerConfig},
    ENV_LOG_RESOLUTIONS, ENV_MAX_RESOLUTION_DEPTH,
};
use crate::errors::ConfigError;

/// Configuration loader responsible for loading config from a file and environment
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that only looks at the environment
    pub fn new() -> Self {
        Self { path: None }
    }

    /// Loader that reads the given TOML file before applying the environment
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Load complete container configuration
    pub fn load_config(&self) -> Result<ContainerConfig, ConfigError> {
        let partial = match &self.path {
            Some(path) => Some(self.load_partial_config(path)?),
            None => None,
        };
        let config = ContainerConfig::from_partial_and_env(partial, collect_env_vars())?;

        tracing::debug!(
            path = ?self.path,
            max_resolution_depth = config.max_resolution_depth,
            log_resolutions = config.log_resolutions,
            "Container configuration loaded"
        );
        Ok(config)
    }

    fn load_partial_config(&self, path: &Path) -> Result<PartialContainerConfig, ConfigError> {
        let display = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::with_path(path.as_ref()).load_config()
    }
}

/// Collect the environment variables the container understands
pub(crate) fn collect_env_vars() -> HashMap<String, String> {
    [ENV_MAX_RESOLUTION_DEPTH, ENV_LOG_RESOLUTIONS]
        .iter()
        .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}
