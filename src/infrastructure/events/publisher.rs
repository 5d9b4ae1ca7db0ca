//! Event Publisher Implementation
//!
//! 应用内事件推送：童谣状态变化、背景音乐播放状态、档案切换

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::song::{SongKey, SongStatus};

/// 应用事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum AppEvent {
    /// 童谣状态变更
    SongStatusChanged {
        session_id: i64,
        storybook_id: i64,
        status: String,
    },
    /// 童谣状态轮询结束
    SongPollFinished {
        session_id: i64,
        storybook_id: i64,
        outcome: String,
    },
    /// 背景音乐播放状态变更
    BgmPlaybackChanged { playing: bool },
    /// 切换儿童档案
    ProfileSelected { child_id: i64 },
    /// 四道测验题全部提交
    QuizFinished { session_id: i64 },
}

/// 事件发布器
pub struct EventPublisher {
    /// song key -> broadcast sender（单首童谣的事件）
    song_channels: DashMap<SongKey, broadcast::Sender<AppEvent>>,
    /// 全局广播通道
    global_channel: broadcast::Sender<AppEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(100);
        Self {
            song_channels: DashMap::new(),
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe_global(&self) -> broadcast::Receiver<AppEvent> {
        self.global_channel.subscribe()
    }

    /// 注册某首童谣的事件通道
    pub fn register_song(&self, key: SongKey) -> broadcast::Receiver<AppEvent> {
        if let Some(sender) = self.song_channels.get(&key) {
            return sender.subscribe();
        }

        let (tx, rx) = broadcast::channel(32);
        self.song_channels.insert(key, tx);
        rx
    }

    /// 取消注册
    pub fn unregister_song(&self, key: SongKey) {
        self.song_channels.remove(&key);
    }

    /// 发布童谣状态变更
    pub fn publish_song_status(&self, key: SongKey, status: SongStatus) {
        self.publish_to_song(
            key,
            AppEvent::SongStatusChanged {
                session_id: key.session_id,
                storybook_id: key.storybook_id,
                status: status.as_str().to_string(),
            },
        );
    }

    /// 发布轮询结束
    pub fn publish_poll_finished(&self, key: SongKey, outcome: &str) {
        self.publish_to_song(
            key,
            AppEvent::SongPollFinished {
                session_id: key.session_id,
                storybook_id: key.storybook_id,
                outcome: outcome.to_string(),
            },
        );
    }

    /// 发布背景音乐播放状态
    pub fn publish_bgm(&self, playing: bool) {
        self.publish_global(AppEvent::BgmPlaybackChanged { playing });
    }

    /// 发布档案切换
    pub fn publish_profile_selected(&self, child_id: i64) {
        self.publish_global(AppEvent::ProfileSelected { child_id });
    }

    /// 发布测验完成
    pub fn publish_quiz_finished(&self, session_id: i64) {
        self.publish_global(AppEvent::QuizFinished { session_id });
    }

    /// 童谣事件同时发往该童谣通道与全局通道
    fn publish_to_song(&self, key: SongKey, event: AppEvent) {
        if let Some(sender) = self.song_channels.get(&key) {
            if let Err(e) = sender.send(event.clone()) {
                tracing::debug!(
                    key = %key,
                    error = %e,
                    "Failed to publish song event (no receivers)"
                );
            }
        }
        self.publish_global(event);
    }

    fn publish_global(&self, event: AppEvent) {
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish global event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_song_events_reach_song_and_global() {
        let publisher = EventPublisher::new();
        let key = SongKey::new(1, 2);
        let mut song_rx = publisher.register_song(key);
        let mut global_rx = publisher.subscribe_global();

        publisher.publish_song_status(key, SongStatus::Ready);

        let expected = AppEvent::SongStatusChanged {
            session_id: 1,
            storybook_id: 2,
            status: "READY".into(),
        };
        assert_eq!(song_rx.recv().await.unwrap(), expected);
        assert_eq!(global_rx.recv().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_unregistered_song_only_global() {
        let publisher = EventPublisher::new();
        let key = SongKey::new(1, 2);
        let mut global_rx = publisher.subscribe_global();
        publisher.publish_poll_finished(key, "timeout");
        assert!(matches!(
            global_rx.recv().await.unwrap(),
            AppEvent::SongPollFinished { .. }
        ));
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(AppEvent::BgmPlaybackChanged { playing: true }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "event": "BgmPlaybackChanged", "data": { "playing": true } })
        );
    }
}
