use super::{Lifetime, Resolver};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, ThreadId};

pub(crate) type ArcService = Arc<dyn Any + Send + Sync>;

/// 类型擦除的服务工厂
pub(crate) trait ServiceFactory: Send + Sync {
    fn create(&self, resolver: &Resolver<'_>) -> anyhow::Result<ArcService>;
}

/// 函数式服务工厂
pub(crate) struct FnServiceFactory<F, T> {
    factory_fn: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> FnServiceFactory<F, T> {
    pub(crate) fn new(factory_fn: F) -> Self {
        Self {
            factory_fn,
            _phantom: PhantomData,
        }
    }
}

impl<F, T> ServiceFactory for FnServiceFactory<F, T>
where
    F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn create(&self, resolver: &Resolver<'_>) -> anyhow::Result<ArcService> {
        let service = (self.factory_fn)(resolver)?;
        Ok(Arc::new(service))
    }
}

/// 已有实例，始终返回同一个 Arc
struct InstanceFactory(ArcService);

impl ServiceFactory for InstanceFactory {
    fn create(&self, _resolver: &Resolver<'_>) -> anyhow::Result<ArcService> {
        Ok(Arc::clone(&self.0))
    }
}

/// 服务注册信息
///
/// 重新绑定时整个 `Binding` 被替换，旧的单例缓存随之丢弃。
pub(crate) struct Binding {
    pub(crate) factory: Box<dyn ServiceFactory>,
    pub(crate) lifetime: Lifetime,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    /// 单例缓存槽；检查和创建都在锁内完成
    pub(crate) instance: Mutex<Option<ArcService>>,
    /// 正在解析此绑定的线程
    active: Mutex<Vec<ThreadId>>,
}

/// 解析结束时把当前线程从 `active` 中移除
pub(crate) struct ActiveGuard<'a> {
    binding: &'a Binding,
    thread: ThreadId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.binding.active.lock();
        if let Some(pos) = active.iter().position(|id| *id == self.thread) {
            active.swap_remove(pos);
        }
    }
}

impl Binding {
    pub(crate) fn from_fn<T, F>(factory: F, lifetime: Lifetime) -> Self
    where
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        Self {
            factory: Box::new(FnServiceFactory::<F, T>::new(factory)),
            lifetime,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance: Mutex::new(None),
            active: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn from_instance<T: Send + Sync + 'static>(value: T) -> Self {
        let service: ArcService = Arc::new(value);
        Self {
            factory: Box::new(InstanceFactory(Arc::clone(&service))),
            lifetime: Lifetime::Singleton,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            instance: Mutex::new(Some(service)),
            active: Mutex::new(Vec::new()),
        }
    }

    /// 标记当前线程开始解析此绑定
    ///
    /// 同一线程重入（无论经由哪个容器句柄）返回 `None`。
    pub(crate) fn enter(&self) -> Option<ActiveGuard<'_>> {
        let current = thread::current().id();
        let mut active = self.active.lock();
        if active.contains(&current) {
            return None;
        }
        active.push(current);
        Some(ActiveGuard {
            binding: self,
            thread: current,
        })
    }

    /// 槽被占用（工厂执行中）时返回 false
    pub(crate) fn is_resolved(&self) -> bool {
        self.instance
            .try_lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
