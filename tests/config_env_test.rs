//! 环境变量覆盖配置的集成测试
//!
//! 单独的测试二进制，修改进程环境不会影响其他测试

use bindery::config::{ENV_LOG_RESOLUTIONS, ENV_MAX_RESOLUTION_DEPTH};
use bindery::{ConfigError, ContainerConfig, ServiceContainer};
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_environment_overrides() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_resolution_depth = 8").unwrap();
    writeln!(file, "log_resolutions = true").unwrap();

    // 无环境变量时以文件为准
    env::remove_var(ENV_MAX_RESOLUTION_DEPTH);
    env::remove_var(ENV_LOG_RESOLUTIONS);
    let config = ContainerConfig::load(file.path()).unwrap();
    assert_eq!(config.max_resolution_depth, 8);
    assert!(config.log_resolutions);

    // 环境变量优先于文件
    env::set_var(ENV_MAX_RESOLUTION_DEPTH, "16");
    env::set_var(ENV_LOG_RESOLUTIONS, "no");
    let config = ContainerConfig::load(file.path()).unwrap();
    assert_eq!(config.max_resolution_depth, 16);
    assert!(!config.log_resolutions);

    let config = ContainerConfig::default().with_env_overrides().unwrap();
    assert_eq!(config.max_resolution_depth, 16);
    assert!(!config.log_resolutions);

    // 覆盖后的配置驱动容器的深度限制
    env::set_var(ENV_MAX_RESOLUTION_DEPTH, "1");
    let config = ContainerConfig::default().with_env_overrides().unwrap();
    let container = ServiceContainer::with_config(config);
    container.bind("inner", |_| Ok(1u8));
    container.bind("outer", |resolver| Ok(*resolver.make::<u8>("inner")?));
    assert!(container.make::<u8>("inner").is_ok());
    assert!(container.make::<u8>("outer").is_err());

    // 非法值
    env::set_var(ENV_MAX_RESOLUTION_DEPTH, "0");
    assert!(matches!(
        ContainerConfig::default().with_env_overrides(),
        Err(ConfigError::InvalidValue { .. })
    ));
    env::set_var(ENV_MAX_RESOLUTION_DEPTH, "deep");
    match ContainerConfig::default().with_env_overrides() {
        Err(ConfigError::InvalidValue { field, value }) => {
            assert_eq!(field, "max_resolution_depth");
            assert_eq!(value, "deep");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    env::remove_var(ENV_MAX_RESOLUTION_DEPTH);
    env::remove_var(ENV_LOG_RESOLUTIONS);
    let config = ContainerConfig::default().with_env_overrides().unwrap();
    assert_eq!(config, ContainerConfig::default());
}
