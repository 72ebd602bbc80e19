pub mod container_config;
pub mod loader;

// Re-export commonly used types
pub use container_config::{ContainerConfig, PartialContainerConfig};
pub use loader::ConfigLoader;

// Environment variable names
pub const ENV_MAX_RESOLUTION_DEPTH: &str = "BINDERY_MAX_RESOLUTION_DEPTH";
pub const ENV_LOG_RESOLUTIONS: &str = "BINDERY_LOG_RESOLUTIONS";
