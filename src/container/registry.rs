use super::binding::{ArcService, Binding};
use super::stats::{ContainerStats, InnerStats};
use super::{Lifetime, Resolver};
use crate::config::ContainerConfig;
use crate::errors::ContainerError;
use crate::logging::OperationTimer;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// 服务容器
///
/// 克隆共享同一份注册表。注册表的锁不会在工厂执行期间持有，
/// 因此工厂内部可以继续调用 `bind` 或通过 [`Resolver`] 解析其他绑定。
#[derive(Clone)]
pub struct ServiceContainer {
    /// 名称 -> 绑定
    bindings: Arc<DashMap<String, Arc<Binding>>>,
    /// 别名 -> 目标名称
    aliases: Arc<DashMap<String, String>>,
    /// 串行化跨两张表的写操作
    registration: Arc<Mutex<()>>,
    stats: Arc<InnerStats>,
    config: Arc<ContainerConfig>,
}

impl ServiceContainer {
    /// 创建新的容器实例
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            bindings: Arc::new(DashMap::new()),
            aliases: Arc::new(DashMap::new()),
            registration: Arc::new(Mutex::new(())),
            stats: Arc::new(InnerStats::default()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 注册瞬态绑定
    pub fn bind<T, F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.bind_with(name, factory, Lifetime::Transient);
    }

    /// 注册单例绑定
    pub fn singleton<T, F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.bind_with(name, factory, Lifetime::Singleton);
    }

    /// 按指定生命周期注册绑定
    ///
    /// 同名绑定被整体替换，已缓存的单例实例随之丢弃。
    pub fn bind_with<T, F>(&self, name: impl Into<String>, factory: F, lifetime: Lifetime)
    where
        F: Fn(&Resolver<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
        T: Send + Sync + 'static,
    {
        self.insert(name.into(), Binding::from_fn(factory, lifetime));
    }

    /// 注册已构建好的实例，解析时总是返回同一个 `Arc`
    pub fn instance<T: Send + Sync + 'static>(&self, name: impl Into<String>, value: T) {
        self.insert(name.into(), Binding::from_instance(value));
    }

    fn insert(&self, name: String, binding: Binding) {
        if name.is_empty() {
            tracing::warn!("Binding registered under an empty name");
        }
        tracing::debug!(
            name = %name,
            lifetime = ?binding.lifetime,
            service_type = binding.type_name,
            "Binding registered"
        );

        let _registration = self.registration.lock();
        self.aliases.remove(&name);
        if self.bindings.insert(name.clone(), Arc::new(binding)).is_some() {
            tracing::debug!(name = %name, "Previous binding replaced");
        }
    }

    /// 注册别名，`alias` 解析为 `target` 的结果
    ///
    /// 名称要么是绑定要么是别名，后注册的一方生效。
    pub fn alias(
        &self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), ContainerError> {
        let alias = alias.into();
        let target = target.into();
        if alias == target {
            return Err(ContainerError::SelfAlias(alias));
        }

        tracing::debug!(alias = %alias, target = %target, "Alias registered");
        let _registration = self.registration.lock();
        self.bindings.remove(&alias);
        self.aliases.insert(alias, target);
        Ok(())
    }

    /// 解析服务
    pub fn make<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        self.make_typed::<T>(name, &[])
    }

    /// 解析服务，返回类型擦除的实例
    pub fn make_any(&self, name: &str) -> Result<Arc<dyn Any + Send + Sync>, ContainerError> {
        self.resolve_erased(name, None, &[])
    }

    /// 检查名称（或别名）是否已注册
    pub fn bound(&self, name: &str) -> bool {
        self.canonical_name(name)
            .map(|canonical| self.bindings.contains_key(&canonical))
            .unwrap_or(false)
    }

    /// 单例是否已经生成实例；正在构造中的单例视为未解析
    pub fn resolved(&self, name: &str) -> bool {
        self.canonical_name(name)
            .ok()
            .and_then(|canonical| self.binding(&canonical))
            .map(|binding| binding.is_resolved())
            .unwrap_or(false)
    }

    /// 已注册的绑定名称（排序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        let bindings: Vec<Arc<Binding>> = self
            .bindings
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let resolved_singletons = bindings
            .iter()
            .filter(|binding| binding.lifetime.is_singleton() && binding.is_resolved())
            .count();

        self.stats.snapshot(bindings.len(), resolved_singletons)
    }

    pub(crate) fn make_typed<T: Send + Sync + 'static>(
        &self,
        name: &str,
        chain: &[String],
    ) -> Result<Arc<T>, ContainerError> {
        let expected = std::any::type_name::<T>();
        let (service, found) =
            self.resolve_inner(name, Some((TypeId::of::<T>(), expected)), chain)?;

        service
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                name: name.to_string(),
                expected,
                found,
            })
    }

    pub(crate) fn resolve_erased(
        &self,
        name: &str,
        expected: Option<(TypeId, &'static str)>,
        chain: &[String],
    ) -> Result<ArcService, ContainerError> {
        self.resolve_inner(name, expected, chain)
            .map(|(service, _)| service)
    }

    /// 内部解析逻辑，同时返回绑定记录的类型名
    fn resolve_inner(
        &self,
        name: &str,
        expected: Option<(TypeId, &'static str)>,
        chain: &[String],
    ) -> Result<(ArcService, &'static str), ContainerError> {
        InnerStats::incr(&self.stats.total_resolutions);

        let canonical = self.canonical_name(name)?;

        // 检查循环依赖
        if let Some(pos) = chain.iter().position(|entry| *entry == canonical) {
            let mut cycle = chain[pos..].to_vec();
            cycle.push(canonical);
            tracing::warn!(chain = ?cycle, "Circular dependency detected");
            return Err(ContainerError::CircularDependency { chain: cycle });
        }

        let limit = self.config.max_resolution_depth;
        if chain.len() >= limit {
            return Err(ContainerError::DepthExceeded {
                name: canonical,
                limit,
            });
        }

        let binding = match self.binding(&canonical) {
            Some(binding) => binding,
            None => {
                InnerStats::incr(&self.stats.unresolved);
                return Err(ContainerError::UnresolvedBinding {
                    name: name.to_string(),
                    available: self.names(),
                });
            }
        };

        // 在调用工厂之前检查类型
        if let Some((type_id, type_name)) = expected {
            if binding.type_id != type_id {
                return Err(ContainerError::TypeMismatch {
                    name: canonical,
                    expected: type_name,
                    found: binding.type_name,
                });
            }
        }

        let mut child_chain = Vec::with_capacity(chain.len() + 1);
        child_chain.extend_from_slice(chain);
        child_chain.push(canonical);
        let name = &child_chain[chain.len()];
        let type_name = binding.type_name;

        // 同线程经由其他容器句柄重入时，链中看不到它，必须在加锁前拦截
        let _active = match binding.enter() {
            Some(guard) => guard,
            None => {
                let mut cycle = Vec::with_capacity(child_chain.len() + 1);
                cycle.push(name.clone());
                cycle.extend_from_slice(&child_chain);
                tracing::warn!(chain = ?cycle, "Circular dependency detected");
                return Err(ContainerError::CircularDependency { chain: cycle });
            }
        };
        let resolver = Resolver::new(self, &child_chain);

        match binding.lifetime {
            Lifetime::Transient => self
                .invoke(name, &binding, &resolver)
                .map(|service| (service, type_name)),
            Lifetime::Singleton => {
                let mut slot = binding.instance.lock();
                if let Some(service) = slot.as_ref() {
                    InnerStats::incr(&self.stats.cache_hits);
                    tracing::trace!(name = %name, "Singleton cache hit");
                    return Ok((Arc::clone(service), type_name));
                }

                InnerStats::incr(&self.stats.cache_misses);
                let service = self.invoke(name, &binding, &resolver)?;
                *slot = Some(Arc::clone(&service));
                Ok((service, type_name))
            }
        }
    }

    /// 调用工厂并包装错误
    fn invoke(
        &self,
        name: &str,
        binding: &Binding,
        resolver: &Resolver<'_>,
    ) -> Result<ArcService, ContainerError> {
        InnerStats::incr(&self.stats.factory_invocations);

        let timer = self
            .config
            .log_resolutions
            .then(|| OperationTimer::new("factory", name));
        let result = binding.factory.create(resolver);
        if let Some(timer) = timer {
            timer.finish(result.is_ok());
        }

        result.map_err(|error| {
            InnerStats::incr(&self.stats.factory_failures);

            // 嵌套解析中的结构性错误原样向上传递
            let structural = matches!(
                error.downcast_ref::<ContainerError>(),
                Some(ContainerError::CircularDependency { .. } | ContainerError::DepthExceeded { .. })
            );
            let error = if structural {
                match error.downcast::<ContainerError>() {
                    Ok(err) => return err,
                    Err(error) => error,
                }
            } else {
                error
            };

            // 其余错误整体保留，工厂附加的 context 不丢失
            tracing::warn!(name = %name, error = %error, "Factory failed");
            ContainerError::Factory {
                name: name.to_string(),
                source: error.into(),
            }
        })
    }

    fn binding(&self, canonical: &str) -> Option<Arc<Binding>> {
        self.bindings
            .get(canonical)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// 沿别名链找到真正的绑定名称
    fn canonical_name(&self, name: &str) -> Result<String, ContainerError> {
        let mut current = name.to_string();
        let mut visited: Vec<String> = Vec::new();

        loop {
            let target = match self.aliases.get(current.as_str()) {
                Some(entry) => entry.value().clone(),
                None => return Ok(current),
            };
            visited.push(current);

            if let Some(pos) = visited.iter().position(|entry| *entry == target) {
                let mut cycle = visited.split_off(pos);
                cycle.push(target);
                return Err(ContainerError::CircularDependency { chain: cycle });
            }
            current = target;
        }
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("bindings", &self.names())
            .field("aliases", &self.aliases.len())
            .field("config", &self.config)
            .finish()
    }
}
