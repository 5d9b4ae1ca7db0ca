//! Domain Layer - 领域层
//!
//! 限界上下文:
//! - audio: 背景音乐播放状态
//! - song: 童谣生成状态机
//! - quiz: 单词测验进度
//! - profile: 儿童档案
//! - dictionary: 主题 / 单词 / 绘本
//! - voice: TTS 音色

pub mod audio;
pub mod dictionary;
pub mod profile;
pub mod quiz;
pub mod recording;
pub mod song;
pub mod voice;
