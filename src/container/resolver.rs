use super::ServiceContainer;
use crate::errors::ContainerError;
use std::any::Any;
use std::sync::Arc;

/// 工厂在解析期间获得的句柄
///
/// 携带本次调用树中正在解析的名称链，用于检测循环依赖。
/// 不同线程上的并发解析各自拥有独立的链。
pub struct Resolver<'a> {
    container: &'a ServiceContainer,
    chain: &'a [String],
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(container: &'a ServiceContainer, chain: &'a [String]) -> Self {
        Self { container, chain }
    }

    /// 解析另一个绑定
    pub fn make<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        self.container.make_typed::<T>(name, self.chain)
    }

    /// 解析另一个绑定，不做类型转换
    pub fn make_any(&self, name: &str) -> Result<Arc<dyn Any + Send + Sync>, ContainerError> {
        self.container.resolve_erased(name, None, self.chain)
    }

    /// 所属容器
    pub fn container(&self) -> &ServiceContainer {
        self.container
    }

    /// 当前解析链，最后一项是正在构造的绑定
    pub fn chain(&self) -> &[String] {
        self.chain
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }
}
