//! 命名绑定的依赖注入容器
//!
//! 提供按名称注册和解析服务的功能，支持：
//! - 瞬态绑定（每次解析都调用工厂）
//! - 单例绑定（工厂最多调用一次，结果缓存）
//! - 已有实例注册与别名
//! - 循环依赖检测
//!
//! ```
//! use bindery::ServiceContainer;
//!
//! #[derive(Debug)]
//! struct Car;
//!
//! let container = ServiceContainer::new();
//! container.bind("car", |_| Ok(Car));
//!
//! let car = container.make::<Car>("car").unwrap();
//! println!("{:?}", car);
//! ```

mod binding;
mod registry;
mod resolver;
mod stats;

pub use registry::ServiceContainer;
pub use resolver::Resolver;
pub use stats::ContainerStats;

/// 绑定生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// 每次解析创建新实例
    #[default]
    Transient,
    /// 整个容器生命周期内只有一个实例
    Singleton,
}

impl Lifetime {
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}
