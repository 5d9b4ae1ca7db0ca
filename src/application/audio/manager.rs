//! Audio Manager - 背景音乐资源管理
//!
//! 整个应用共享一个循环播放的背景音乐资源。由组合根显式构造并以
//! `Arc<AudioManager>` 传给订阅者，不使用进程级单例。
//!
//! 状态机: Unloaded / LoadedPaused / LoadedPlaying
//! - load_sound: 先卸载旧资源，保证任意时刻最多一个已加载资源
//! - toggle_sound: 暂停只看本地标志，播放前重新确认底层资源仍已加载
//! - cleanup: 任意状态 → Unloaded

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;

use crate::application::ports::{
    AudioMode, AudioPlayerPort, PlayerError, SoundHandle, SoundSource, SoundStatus,
};
use crate::domain::audio::PlaybackState;

/// 播放状态监听器
pub type StatusListener = Arc<dyn Fn(bool) + Send + Sync>;

/// 背景音乐管理器
pub struct AudioManager {
    player: Arc<dyn AudioPlayerPort>,
    source: SoundSource,
    mode: AudioMode,
    /// 唯一的音频句柄，加载 / 播放 / 卸载都在此锁内串行执行
    sound: Mutex<Option<Box<dyn SoundHandle>>>,
    loaded: AtomicBool,
    playing: AtomicBool,
    listener: StdMutex<Option<StatusListener>>,
}

impl AudioManager {
    pub fn new(player: Arc<dyn AudioPlayerPort>, source: SoundSource, mode: AudioMode) -> Self {
        Self {
            player,
            source,
            mode,
            sound: Mutex::new(None),
            loaded: AtomicBool::new(false),
            playing: AtomicBool::new(false),
            listener: StdMutex::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 设置音频会话，失败只记录日志
    pub async fn setup_audio(&self) {
        match self.player.set_audio_mode(&self.mode).await {
            Ok(()) => tracing::info!(mode = ?self.mode, "Audio mode configured"),
            Err(e) => tracing::error!(error = %e, "Failed to configure audio mode"),
        }
    }

    /// 加载背景音乐，返回是否加载成功
    pub async fn load_sound(&self) -> bool {
        let mut sound = self.sound.lock().await;
        self.load_locked(&mut sound).await
    }

    /// 切换播放 / 暂停
    pub async fn toggle_sound(&self) {
        let mut sound = self.sound.lock().await;

        if sound.is_none() || !self.loaded.load(Ordering::SeqCst) {
            tracing::info!("Sound not loaded, reloading before play");
            if self.load_locked(&mut sound).await {
                if let Err(e) = self.play_locked(&mut sound).await {
                    tracing::error!(error = %e, "Failed to play after reload");
                }
            }
            return;
        }

        tracing::debug!(playing = self.is_audio_playing(), "Toggling BGM");
        if let Err(e) = self.toggle_locked(&mut sound).await {
            tracing::error!(error = %e, "BGM toggle failed, reloading");
            self.load_locked(&mut sound).await;
        }
    }

    /// 暂停（不卸载），未播放时不做任何事
    pub async fn stop_sound(&self) {
        let mut sound = self.sound.lock().await;
        if !self.loaded.load(Ordering::SeqCst) || !self.is_audio_playing() {
            return;
        }
        let Some(handle) = sound.as_mut() else {
            return;
        };

        tracing::info!("Stopping BGM");
        match handle.pause().await {
            Ok(_) => self.set_playing(false),
            Err(e) => tracing::error!(error = %e, "Failed to stop BGM"),
        }
    }

    /// 暂停并卸载，根组件卸载时调用
    pub async fn cleanup(&self) {
        let mut sound = self.sound.lock().await;
        if let Some(mut handle) = sound.take() {
            if self.is_audio_playing() {
                if let Err(e) = handle.pause().await {
                    tracing::warn!(error = %e, "Failed to pause during cleanup");
                }
            }
            if let Err(e) = handle.unload().await {
                tracing::error!(error = %e, "Failed to unload during cleanup");
            }
        }
        self.loaded.store(false, Ordering::SeqCst);
        self.set_playing(false);
        tracing::debug!("Audio cleaned up");
    }

    /// 注册唯一的监听器（后注册者覆盖），并立即通知当前状态
    pub fn set_status_listener<F>(&self, listener: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let listener: StatusListener = Arc::new(listener);
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(listener.clone());
        }
        listener(self.is_audio_playing());
    }

    pub fn is_audio_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn is_sound_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState::from_flags(self.is_sound_loaded(), self.is_audio_playing())
    }

    async fn load_locked(&self, sound: &mut Option<Box<dyn SoundHandle>>) -> bool {
        if let Some(mut previous) = sound.take() {
            tracing::debug!("Unloading previous sound");
            if let Err(e) = previous.unload().await {
                tracing::warn!(error = %e, "Failed to unload previous sound");
            }
            self.set_playing(false);
        }
        self.loaded.store(false, Ordering::SeqCst);

        match self.player.load(&self.source).await {
            Ok(handle) => {
                *sound = Some(handle);
                self.loaded.store(true, Ordering::SeqCst);
                tracing::info!(path = %self.source.path.display(), "Sound loaded");
                true
            }
            Err(e) => {
                tracing::error!(
                    path = %self.source.path.display(),
                    error = %e,
                    "Failed to load sound"
                );
                false
            }
        }
    }

    async fn toggle_locked(
        &self,
        sound: &mut Option<Box<dyn SoundHandle>>,
    ) -> Result<(), PlayerError> {
        let handle = sound.as_mut().ok_or(PlayerError::NotLoaded)?;

        if self.is_audio_playing() {
            let status = handle.pause().await?;
            self.observe(status);
            return Ok(());
        }

        if handle.status().await.is_loaded {
            let status = handle.play().await?;
            self.observe(status);
        } else {
            tracing::warn!("Sound was unloaded underneath, reloading");
            if self.load_locked(sound).await {
                self.play_locked(sound).await?;
            }
        }
        Ok(())
    }

    async fn play_locked(
        &self,
        sound: &mut Option<Box<dyn SoundHandle>>,
    ) -> Result<(), PlayerError> {
        let handle = sound.as_mut().ok_or(PlayerError::NotLoaded)?;
        let status = handle.play().await?;
        self.observe(status);
        Ok(())
    }

    fn observe(&self, status: SoundStatus) {
        if status.is_loaded {
            self.set_playing(status.is_playing);
        }
    }

    /// 仅在状态真正变化时通知（边沿触发）
    fn set_playing(&self, playing: bool) {
        let was_playing = self.playing.swap(playing, Ordering::SeqCst);
        if was_playing == playing {
            return;
        }
        let listener = self.listener.lock().ok().and_then(|slot| slot.clone());
        if let Some(listener) = listener {
            listener(playing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeAudioPlayer;
    use std::path::PathBuf;

    fn manager(player: &FakeAudioPlayer) -> AudioManager {
        AudioManager::new(
            Arc::new(player.clone()),
            SoundSource {
                path: PathBuf::from("assets/sounds/background-music.mp3"),
                looping: true,
                volume: 1.0,
            },
            AudioMode::default(),
        )
    }

    fn recorder(manager: &AudioManager) -> Arc<StdMutex<Vec<bool>>> {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let sink = calls.clone();
        manager.set_status_listener(move |playing| sink.lock().unwrap().push(playing));
        calls
    }

    #[tokio::test]
    async fn test_double_load_keeps_single_handle() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);

        assert!(manager.load_sound().await);
        assert!(manager.load_sound().await);

        assert_eq!(player.load_count(), 2);
        assert_eq!(player.live_handles(), 1);
        assert!(manager.is_sound_loaded());
        assert_eq!(manager.playback_state(), PlaybackState::LoadedPaused);
    }

    #[tokio::test]
    async fn test_two_toggles_restore_state() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        manager.load_sound().await;

        let before = manager.is_audio_playing();
        manager.toggle_sound().await;
        assert_eq!(manager.is_audio_playing(), !before);
        manager.toggle_sound().await;
        assert_eq!(manager.is_audio_playing(), before);
    }

    #[tokio::test]
    async fn test_listener_gets_current_state_on_register() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        manager.load_sound().await;
        manager.toggle_sound().await;
        assert!(manager.is_audio_playing());

        let calls = recorder(&manager);
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[tokio::test]
    async fn test_listener_is_edge_triggered_and_last_wins() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        let first = recorder(&manager);
        let second = recorder(&manager);

        manager.toggle_sound().await; // 自动加载并播放
        manager.stop_sound().await;
        manager.stop_sound().await; // 已暂停，不通知

        assert_eq!(*first.lock().unwrap(), vec![false]);
        assert_eq!(*second.lock().unwrap(), vec![false, true, false]);
    }

    #[tokio::test]
    async fn test_toggle_without_load_self_heals() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);

        manager.toggle_sound().await;
        assert_eq!(manager.playback_state(), PlaybackState::LoadedPlaying);
        assert_eq!(player.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_toggle_reloads_when_evicted() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        manager.load_sound().await;

        player.evict_all();
        manager.toggle_sound().await;

        assert_eq!(player.load_count(), 2);
        assert_eq!(player.live_handles(), 1);
        assert!(manager.is_audio_playing());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_unloaded() {
        let player = FakeAudioPlayer::new();
        player.set_fail_loads(true);
        let manager = manager(&player);

        assert!(!manager.load_sound().await);
        manager.toggle_sound().await;

        assert_eq!(manager.playback_state(), PlaybackState::Unloaded);
        assert_eq!(player.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_stop_pauses_without_unload() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        manager.toggle_sound().await;

        manager.stop_sound().await;
        assert_eq!(manager.playback_state(), PlaybackState::LoadedPaused);
        assert_eq!(player.live_handles(), 1);
    }

    #[tokio::test]
    async fn test_cleanup_releases_resource() {
        let player = FakeAudioPlayer::new();
        let manager = manager(&player);
        manager.toggle_sound().await;

        manager.cleanup().await;
        assert_eq!(manager.playback_state(), PlaybackState::Unloaded);
        assert_eq!(player.live_handles(), 0);

        manager.cleanup().await;
        assert_eq!(player.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_setup_audio_failure_is_not_fatal() {
        let player = FakeAudioPlayer::new();
        player.set_fail_audio_mode(true);
        let manager = manager(&player);

        manager.setup_audio().await;
        assert!(manager.load_sound().await);
    }
}
