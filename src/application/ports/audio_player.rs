//! Audio Player Port - 平台音频播放抽象
//!
//! 对应移动端的音频会话与 Sound 对象，具体实现在 infrastructure/adapters/player 层

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Audio session error: {0}")]
    SessionError(String),

    #[error("Load failed: {0}")]
    LoadFailed(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Sound is not loaded")]
    NotLoaded,
}

/// 与其他应用音频并存的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionMode {
    /// 与其他音频混合播放
    MixWithOthers,
    /// 降低其他音频的音量
    DuckOthers,
}

/// 音频会话设置
///
/// iOS 与 Android 的并存方式分开设置，背景音乐在 iOS 上混合播放，在 Android 上压低其他音频
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMode {
    pub plays_in_silent_mode: bool,
    pub stays_active_in_background: bool,
    pub interruption_ios: InterruptionMode,
    pub interruption_android: InterruptionMode,
    /// Android 上其他应用发声时是否压低本应用音量
    pub should_duck_android: bool,
    pub play_through_earpiece: bool,
}

impl AudioMode {
    /// Android 会话是否会压低其他音频
    pub fn ducks_others(&self) -> bool {
        self.interruption_android == InterruptionMode::DuckOthers && self.should_duck_android
    }
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            plays_in_silent_mode: true,
            stays_active_in_background: true,
            interruption_ios: InterruptionMode::MixWithOthers,
            interruption_android: InterruptionMode::DuckOthers,
            should_duck_android: true,
            play_through_earpiece: false,
        }
    }
}

/// 要加载的音源
#[derive(Debug, Clone, PartialEq)]
pub struct SoundSource {
    pub path: PathBuf,
    pub looping: bool,
    pub volume: f32,
}

/// 播放器实时状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoundStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
}

/// 已加载的音频句柄
#[async_trait]
pub trait SoundHandle: Send + Sync {
    async fn play(&mut self) -> Result<SoundStatus, PlayerError>;

    async fn pause(&mut self) -> Result<SoundStatus, PlayerError>;

    /// 查询底层资源的实时状态（可能已被系统卸载）
    async fn status(&self) -> SoundStatus;

    async fn unload(&mut self) -> Result<(), PlayerError>;
}

/// Audio Player Port
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// 设置音频会话
    async fn set_audio_mode(&self, mode: &AudioMode) -> Result<(), PlayerError>;

    /// 加载音源，返回暂停状态的句柄
    async fn load(&self, source: &SoundSource) -> Result<Box<dyn SoundHandle>, PlayerError>;
}
