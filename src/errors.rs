use thiserror::Error;

/// 工厂返回的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 容器错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 名称未注册
    #[error("No binding registered for '{name}'{}", available_hint(.available))]
    UnresolvedBinding {
        name: String,
        available: Vec<String>,
    },
    /// 工厂执行失败
    #[error("Factory for '{name}' failed: {source}")]
    Factory {
        name: String,
        #[source]
        source: BoxError,
    },
    /// 循环依赖
    #[error("Circular dependency detected: {}", .chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },
    /// 解析深度超限
    #[error("Resolution of '{name}' exceeded the maximum depth of {limit}")]
    DepthExceeded { name: String, limit: usize },
    /// 类型不匹配
    #[error("Binding '{name}' produces '{found}', requested '{expected}'")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("'{0}' cannot be aliased to itself")]
    SelfAlias(String),
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(". Available bindings: {}", available.join(", "))
    }
}

impl ContainerError {
    /// 绑定名称（若有）
    pub fn binding_name(&self) -> Option<&str> {
        match self {
            ContainerError::UnresolvedBinding { name, .. }
            | ContainerError::Factory { name, .. }
            | ContainerError::DepthExceeded { name, .. }
            | ContainerError::TypeMismatch { name, .. }
            | ContainerError::SelfAlias(name) => Some(name),
            ContainerError::CircularDependency { chain } => chain.last().map(String::as_str),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for configuration field '{field}'")]
    InvalidValue { field: String, value: String },
}
