//! 命名绑定的服务容器
//!
//! 按名称注册工厂，按需解析实例，可选单例缓存。

pub mod config;
pub mod container;
pub mod errors;
pub mod logging;

// Re-export commonly used items for convenience
pub use config::ContainerConfig;
pub use container::{ContainerStats, Lifetime, Resolver, ServiceContainer};
pub use errors::{BoxError, ConfigError, ContainerError};
