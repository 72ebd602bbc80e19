use std::time::Instant;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志环境配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingEnvironment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 生产环境
    Production,
}

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// 紧凑格式
    Compact,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub environment: LoggingEnvironment,
    /// 默认日志级别，`RUST_LOG` 存在时以其为准
    pub level: Level,
    pub format: LogFormat,
    pub show_target: bool,
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::INFO,
            format: LogFormat::Pretty,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            show_target: true,
            show_thread_ids: true,
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        Self {
            environment: LoggingEnvironment::Production,
            level: Level::INFO,
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
        }
    }

    /// 创建测试环境配置
    pub fn testing() -> Self {
        Self {
            environment: LoggingEnvironment::Testing,
            level: Level::ERROR,
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_ascii_lowercase()))
    }
}

/// 初始化日志系统
///
/// 全局订阅者只能安装一次，重复调用返回错误。
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = config.env_filter();
    let ansi = config.environment != LoggingEnvironment::Production;

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    tracing::info!(
        environment = ?config.environment,
        level = ?config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// 操作计时器
pub struct OperationTimer {
    start: Instant,
    operation: &'static str,
    subject: String,
}

impl OperationTimer {
    pub fn new(operation: &'static str, subject: &str) -> Self {
        Self {
            start: Instant::now(),
            operation,
            subject: subject.to_string(),
        }
    }

    /// 获取当前经过时间
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// 完成计时并记录日志
    pub fn finish(self, success: bool) {
        let duration = self.start.elapsed();

        tracing::debug!(
            operation = self.operation,
            subject = %self.subject,
            success,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_config_creation() {
        let dev_config = LoggingConfig::development();
        assert_eq!(dev_config.environment, LoggingEnvironment::Development);
        assert_eq!(dev_config.level, Level::DEBUG);
        assert_eq!(dev_config.format, LogFormat::Pretty);

        let prod_config = LoggingConfig::production();
        assert_eq!(prod_config.environment, LoggingEnvironment::Production);
        assert_eq!(prod_config.level, Level::INFO);
        assert_eq!(prod_config.format, LogFormat::Compact);

        let test_config = LoggingConfig::testing();
        assert_eq!(test_config.environment, LoggingEnvironment::Testing);
        assert_eq!(test_config.level, Level::ERROR);
        assert!(!test_config.show_target);
    }

    #[test]
    fn test_init_logging_twice_fails() {
        // 第一次可能因其他测试已安装订阅者而失败，第二次一定失败
        let _ = init_logging(LoggingConfig::testing());
        assert!(init_logging(LoggingConfig::testing()).is_err());
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("factory", "car");
        assert_eq!(timer.operation, "factory");
        assert_eq!(timer.subject, "car");

        std::thread::sleep(Duration::from_millis(1));
        assert!(timer.elapsed() >= Duration::from_millis(1));

        timer.finish(true);
    }
}
