//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::SoundSource;
use crate::infrastructure::adapters::HttpBackendConfig;
use crate::infrastructure::persistence::SledStoreConfig;
use crate::infrastructure::SongPollerConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 后端 API 配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 本地存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 背景音乐配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 童谣状态轮询配置
    #[serde(default)]
    pub poll: PollConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 后端 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 后端基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://www.aieng.co.kr/api".to_string()
}

fn default_api_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn backend_config(&self) -> HttpBackendConfig {
        HttpBackendConfig::new(&self.base_url).with_timeout(self.timeout_secs)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// sled 数据库目录
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "data/aieng.sled".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl StorageConfig {
    pub fn sled_config(&self) -> SledStoreConfig {
        SledStoreConfig {
            db_path: self.db_path.clone(),
        }
    }
}

/// 背景音乐配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// 循环播放的背景音乐文件
    #[serde(default = "default_bgm_path")]
    pub bgm_path: PathBuf,

    /// 音量 0.0 ~ 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_bgm_path() -> PathBuf {
    PathBuf::from("assets/audio/bgm.mp3")
}

fn default_volume() -> f32 {
    1.0
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            bgm_path: default_bgm_path(),
            volume: default_volume(),
        }
    }
}

impl AudioConfig {
    /// 背景音乐总是循环播放
    pub fn bgm_source(&self) -> SoundSource {
        SoundSource {
            path: self.bgm_path.clone(),
            looping: true,
            volume: self.volume,
        }
    }
}

/// 轮询配置
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// 单次轮询的总时长上限
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

fn default_poll_interval() -> u64 {
    3
}

fn default_poll_timeout() -> u64 {
    300
}

fn default_max_backoff() -> u64 {
    30
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            timeout_secs: default_poll_timeout(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl PollConfig {
    pub fn poller_config(&self) -> SongPollerConfig {
        SongPollerConfig {
            interval: Duration::from_secs(self.interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            max_backoff: Duration::from_secs(self.max_backoff_secs),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://www.aieng.co.kr/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.storage.db_path, "data/aieng.sled");
        assert_eq!(config.poll.interval_secs, 3);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_bgm_source_loops() {
        let config = AudioConfig {
            volume: 0.4,
            ..AudioConfig::default()
        };
        let source = config.bgm_source();
        assert!(source.looping);
        assert_eq!(source.volume, 0.4);
        assert_eq!(source.path, default_bgm_path());
    }

    #[test]
    fn test_poller_config_conversion() {
        let poll = PollConfig {
            interval_secs: 2,
            timeout_secs: 60,
            max_backoff_secs: 10,
        };
        let converted = poll.poller_config();
        assert_eq!(converted.interval, Duration::from_secs(2));
        assert_eq!(converted.timeout, Duration::from_secs(60));
        assert_eq!(converted.max_backoff, Duration::from_secs(10));
    }
}
