//! AIENG - 儿童英语学习应用核心
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Song Context: 童谣生成状态机
//! - Quiz Context: 四题测验进度
//! - Profile Context: 儿童档案（单一激活）
//! - Audio / Dictionary / Voice / Recording
//!
//! 应用层 (application/):
//! - Ports: 端口定义（BackendApi, LocalStore, AudioPlayer, SongStateCache）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//! - Audio: AudioManager 与背景音乐控制
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: REST 客户端、音频播放器
//! - Persistence: Sled 本地键值存储
//! - Memory: 内存存储与童谣状态缓存
//! - Worker: 童谣状态轮询
//! - Events: 应用事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
