//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AIENG_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AIENG_API__BASE_URL=http://localhost:8080/api`
/// - `AIENG_STORAGE__DB_PATH=/data/aieng.sled`
/// - `AIENG_POLL__INTERVAL_SECS=5`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("api.base_url", "https://www.aieng.co.kr/api")?
        .set_default("api.timeout_secs", 10)?
        .set_default("storage.db_path", "data/aieng.sled")?
        .set_default("audio.bgm_path", "assets/audio/bgm.mp3")?
        .set_default("audio.volume", 1.0)?
        .set_default("poll.interval_secs", 3)?
        .set_default("poll.timeout_secs", 300)?
        .set_default("poll.max_backoff_secs", 30)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("AIENG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "API base URL cannot be empty".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "API timeout cannot be 0".to_string(),
        ));
    }

    if config.storage.db_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Storage path cannot be empty".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.audio.volume) {
        return Err(ConfigError::ValidationError(format!(
            "Audio volume must be within 0.0..=1.0, got {}",
            config.audio.volume
        )));
    }

    if config.poll.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Poll interval cannot be 0".to_string(),
        ));
    }

    if config.poll.timeout_secs < config.poll.interval_secs {
        return Err(ConfigError::ValidationError(
            "Poll timeout cannot be shorter than the poll interval".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("API Base URL: {}", config.api.base_url);
    tracing::info!("API Timeout: {}s", config.api.timeout_secs);
    tracing::info!("Storage: {}", config.storage.db_path);
    tracing::info!("BGM: {:?} (volume {})", config.audio.bgm_path, config.audio.volume);
    tracing::info!(
        "Song Poll: every {}s, timeout {}s, max backoff {}s",
        config.poll.interval_secs,
        config.poll.timeout_secs,
        config.poll.max_backoff_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
