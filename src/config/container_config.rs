use serde::Deserialize;
use std::collections::HashMap;

use super::{ENV_LOG_RESOLUTIONS, ENV_MAX_RESOLUTION_DEPTH};
use crate::errors::ConfigError;

/// Container configuration
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Deepest nested resolution allowed before giving up
    #[serde(default = "default_max_resolution_depth")]
    pub max_resolution_depth: usize,
    /// Emit timing events for every factory invocation
    #[serde(default = "default_log_resolutions")]
    pub log_resolutions: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: default_max_resolution_depth(),
            log_resolutions: default_log_resolutions(),
        }
    }
}

/// Partial configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialContainerConfig {
    pub max_resolution_depth: Option<usize>,
    pub log_resolutions: Option<bool>,
}

impl ContainerConfig {
    /// Parse a TOML document, filling missing fields with defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialContainerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::TomlParse("<inline>".to_string(), e))?;
        Self::from_partial_and_env(Some(partial), HashMap::new())
    }

    /// Create ContainerConfig from partial config and environment.
    /// Environment values win over file values.
    pub fn from_partial_and_env(
        partial: Option<PartialContainerConfig>,
        env_map: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let max_resolution_depth = match env_map.get(ENV_MAX_RESOLUTION_DEPTH) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                field: "max_resolution_depth".to_string(),
                value: raw.clone(),
            })?,
            None => partial
                .max_resolution_depth
                .unwrap_or_else(default_max_resolution_depth),
        };

        let log_resolutions = match env_map.get(ENV_LOG_RESOLUTIONS) {
            Some(raw) => parse_bool(raw).ok_or_else(|| ConfigError::InvalidValue {
                field: "log_resolutions".to_string(),
                value: raw.clone(),
            })?,
            None => partial.log_resolutions.unwrap_or_else(default_log_resolutions),
        };

        let config = Self {
            max_resolution_depth,
            log_resolutions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides from the current process
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let partial = PartialContainerConfig {
            max_resolution_depth: Some(self.max_resolution_depth),
            log_resolutions: Some(self.log_resolutions),
        };
        Self::from_partial_and_env(Some(partial), super::loader::collect_env_vars())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_resolution_depth".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Default functions
fn default_max_resolution_depth() -> usize {
    64
}

fn default_log_resolutions() -> bool {
    true
}
