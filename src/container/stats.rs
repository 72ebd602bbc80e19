use std::sync::atomic::{AtomicU64, Ordering};

/// 内部容器统计信息（原子计数器）
#[derive(Default)]
pub(crate) struct InnerStats {
    pub(crate) total_resolutions: AtomicU64,
    pub(crate) cache_hits: AtomicU64,
    pub(crate) cache_misses: AtomicU64,
    pub(crate) factory_invocations: AtomicU64,
    pub(crate) factory_failures: AtomicU64,
    pub(crate) unresolved: AtomicU64,
}

impl InnerStats {
    #[inline]
    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, registered_bindings: usize, resolved_singletons: usize) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            factory_invocations: self.factory_invocations.load(Ordering::Relaxed),
            factory_failures: self.factory_failures.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            registered_bindings,
            resolved_singletons,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 总解析次数（包含工厂内部的嵌套解析）
    pub total_resolutions: u64,
    /// 单例缓存命中次数
    pub cache_hits: u64,
    /// 单例缓存未命中次数
    pub cache_misses: u64,
    /// 工厂调用次数
    pub factory_invocations: u64,
    /// 工厂失败次数
    pub factory_failures: u64,
    /// 未注册名称的解析次数
    pub unresolved: u64,
    pub registered_bindings: usize,
    pub resolved_singletons: usize,
}

impl ContainerStats {
    /// 单例缓存命中率（小数形式）
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// 获取性能指标摘要
    pub fn summary(&self) -> String {
        format!(
            "Container: {} resolutions, {:.1}% singleton hit rate, {} factory calls ({} failed), {} bindings, {} resolved singletons",
            self.total_resolutions,
            self.hit_rate() * 100.0,
            self.factory_invocations,
            self.factory_failures,
            self.registered_bindings,
            self.resolved_singletons
        )
    }
}
