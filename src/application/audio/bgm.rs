//! BGM Controller - 界面使用的背景音乐状态
//!
//! 挂载时设置会话、加载音乐并把播放状态同步到 watch 通道，
//! 卸载时释放资源。

use std::sync::Arc;
use tokio::sync::watch;

use super::AudioManager;
use crate::infrastructure::events::EventPublisher;

pub struct BgmController {
    manager: Arc<AudioManager>,
    playing_tx: watch::Sender<bool>,
    event_publisher: Option<Arc<EventPublisher>>,
}

impl BgmController {
    pub fn new(manager: Arc<AudioManager>) -> Self {
        let (playing_tx, _) = watch::channel(manager.is_audio_playing());
        Self {
            manager,
            playing_tx,
            event_publisher: None,
        }
    }

    pub fn with_events(mut self, event_publisher: Arc<EventPublisher>) -> Self {
        self.event_publisher = Some(event_publisher);
        self
    }

    /// 设置会话、注册监听器并加载音乐
    pub async fn mount(&self) {
        let tx = self.playing_tx.clone();
        let events = self.event_publisher.clone();
        self.manager.set_status_listener(move |playing| {
            tx.send_replace(playing);
            if let Some(events) = &events {
                events.publish_bgm(playing);
            }
        });

        self.manager.setup_audio().await;
        self.manager.load_sound().await;
        self.playing_tx.send_replace(self.manager.is_audio_playing());
    }

    pub async fn toggle_bgm(&self) {
        self.manager.toggle_sound().await;
    }

    /// 仅在播放中时停止
    pub async fn stop_bgm(&self) {
        if self.is_bgm_playing() {
            self.manager.stop_sound().await;
            self.playing_tx.send_replace(false);
        }
    }

    pub async fn unmount(&self) {
        self.manager.cleanup().await;
    }

    pub fn is_bgm_playing(&self) -> bool {
        *self.playing_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.playing_tx.subscribe()
    }

    pub fn manager(&self) -> &Arc<AudioManager> {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AudioMode, SoundSource};
    use crate::domain::audio::PlaybackState;
    use crate::infrastructure::adapters::FakeAudioPlayer;
    use crate::infrastructure::events::AppEvent;
    use std::path::PathBuf;

    fn controller(player: &FakeAudioPlayer) -> BgmController {
        let manager = AudioManager::new(
            Arc::new(player.clone()),
            SoundSource {
                path: PathBuf::from("bgm.mp3"),
                looping: true,
                volume: 0.8,
            },
            AudioMode::default(),
        )
        .arc();
        BgmController::new(manager)
    }

    #[tokio::test]
    async fn test_mount_loads_paused() {
        let player = FakeAudioPlayer::new();
        let bgm = controller(&player);
        bgm.mount().await;

        assert!(!bgm.is_bgm_playing());
        assert_eq!(bgm.manager().playback_state(), PlaybackState::LoadedPaused);
        assert_eq!(player.audio_mode_calls(), 1);
    }

    #[tokio::test]
    async fn test_toggle_updates_watch_and_events() {
        let player = FakeAudioPlayer::new();
        let events = EventPublisher::new().arc();
        let mut global = events.subscribe_global();
        let bgm = controller(&player).with_events(events.clone());
        bgm.mount().await;
        let mut rx = bgm.subscribe();

        bgm.toggle_bgm().await;
        assert!(*rx.borrow_and_update());
        assert!(bgm.is_bgm_playing());

        // 注册时的通知 (false) 之后是 true
        let mut seen = Vec::new();
        while let Ok(event) = global.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen.last(),
            Some(&AppEvent::BgmPlaybackChanged { playing: true })
        );

        bgm.stop_bgm().await;
        assert!(!bgm.is_bgm_playing());
    }

    #[tokio::test]
    async fn test_unmount_releases() {
        let player = FakeAudioPlayer::new();
        let bgm = controller(&player);
        bgm.mount().await;
        bgm.toggle_bgm().await;
        bgm.unmount().await;

        assert_eq!(player.live_handles(), 0);
        assert!(!bgm.is_bgm_playing());
    }
}
