//! Song Status Poller - 后台轮询童谣生成状态
//!
//! 按固定间隔查询状态直到 READY / SAVED / FAILED，总时长受超时限制。
//! 网络类暂时性错误按指数退避重试，认证或会话失效错误立即停止。

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ApiError, AuthContext, BackendApiPort};
use crate::domain::song::{SongKey, SongState, SongStatus};
use crate::infrastructure::events::EventPublisher;

/// 轮询配置
#[derive(Debug, Clone)]
pub struct SongPollerConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub max_backoff: Duration,
}

impl Default for SongPollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// 轮询结果
#[derive(Debug)]
pub enum PollOutcome {
    /// 到达 READY / SAVED / FAILED
    Settled(SongState),
    /// 超时，附带最后一次观察到的状态
    TimedOut(Option<SongStatus>),
    Cancelled,
    /// 不可重试的错误
    Aborted(ApiError),
}

impl PollOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Settled(_) => "settled",
            PollOutcome::TimedOut(_) => "timeout",
            PollOutcome::Cancelled => "cancelled",
            PollOutcome::Aborted(_) => "aborted",
        }
    }
}

/// 轮询停止的状态
fn is_settled(status: SongStatus) -> bool {
    status.has_audio() || status == SongStatus::Failed
}

/// 童谣状态轮询器
pub struct SongStatusPoller {
    config: SongPollerConfig,
    backend: Arc<dyn BackendApiPort>,
    event_publisher: Arc<EventPublisher>,
}

impl SongStatusPoller {
    pub fn new(
        config: SongPollerConfig,
        backend: Arc<dyn BackendApiPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            config,
            backend,
            event_publisher,
        }
    }

    /// 在后台任务中轮询
    pub fn spawn(
        self: Arc<Self>,
        auth: AuthContext,
        key: SongKey,
        cancel: CancellationToken,
    ) -> tokio::task::JoinHandle<PollOutcome> {
        tokio::spawn(async move { self.poll(&auth, key, &cancel).await })
    }

    /// 轮询直到停止，每次状态变化都会发布事件
    pub async fn poll(
        &self,
        auth: &AuthContext,
        key: SongKey,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let deadline = Instant::now() + self.config.timeout;
        let mut last_status: Option<SongStatus> = None;
        let mut failures: u32 = 0;

        tracing::info!(
            key = %key,
            interval_ms = self.config.interval.as_millis() as u64,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "Song status polling started"
        );

        let outcome = loop {
            if cancel.is_cancelled() {
                break PollOutcome::Cancelled;
            }

            let delay = match self.backend.song_status(auth, key).await {
                Ok(state) => {
                    failures = 0;
                    let status = state.status();
                    if last_status != Some(status) {
                        tracing::info!(key = %key, status = %status, "Song status changed");
                        self.event_publisher.publish_song_status(key, status);
                        last_status = Some(status);
                    }
                    if is_settled(status) {
                        break PollOutcome::Settled(state);
                    }
                    self.config.interval
                }
                Err(e) if e.is_transient() => {
                    failures += 1;
                    let backoff = self.backoff(failures);
                    tracing::warn!(
                        key = %key,
                        error = %e,
                        attempt = failures,
                        backoff_ms = backoff.as_millis() as u64,
                        "Transient error while polling song status"
                    );
                    backoff
                }
                Err(e) => {
                    tracing::error!(key = %key, error = %e, "Song status polling aborted");
                    break PollOutcome::Aborted(e);
                }
            };

            let now = Instant::now();
            if now >= deadline {
                break PollOutcome::TimedOut(last_status);
            }
            let wake_at = (now + delay).min(deadline);

            tokio::select! {
                _ = cancel.cancelled() => break PollOutcome::Cancelled,
                _ = tokio::time::sleep_until(wake_at) => {}
            }

            if Instant::now() >= deadline {
                break PollOutcome::TimedOut(last_status);
            }
        };

        tracing::info!(key = %key, outcome = outcome.as_str(), "Song status polling finished");
        self.event_publisher.publish_poll_finished(key, outcome.as_str());
        outcome
    }

    /// interval * 2^(failures-1)，不超过 max_backoff
    fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.config
            .interval
            .saturating_mul(factor)
            .min(self.config.max_backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeBackendApi;
    use crate::infrastructure::events::AppEvent;

    fn fast_config() -> SongPollerConfig {
        SongPollerConfig {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(2),
            max_backoff: Duration::from_millis(20),
        }
    }

    fn auth(backend: &FakeBackendApi) -> AuthContext {
        AuthContext::child(backend.access_token(), 1)
    }

    #[tokio::test]
    async fn test_polls_until_ready_and_publishes_changes() {
        let backend = FakeBackendApi::new();
        let key = SongKey::new(7, 3);
        backend.script_statuses(
            key,
            vec![
                Ok(SongStatus::Requested),
                Ok(SongStatus::InProgress),
                Ok(SongStatus::InProgress),
                Ok(SongStatus::Ready),
            ],
        );
        let events = EventPublisher::new().arc();
        let mut song_rx = events.register_song(key);
        let poller = SongStatusPoller::new(fast_config(), Arc::new(backend.clone()), events);

        let outcome = poller
            .poll(&auth(&backend), key, &CancellationToken::new())
            .await;

        match outcome {
            PollOutcome::Settled(state) => assert_eq!(state.status(), SongStatus::Ready),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(backend.status_calls(), 4);

        let mut statuses = Vec::new();
        while let Ok(event) = song_rx.try_recv() {
            if let AppEvent::SongStatusChanged { status, .. } = event {
                statuses.push(status);
            }
        }
        assert_eq!(statuses, vec!["REQUESTED", "IN_PROGRESS", "READY"]);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let backend = FakeBackendApi::new();
        let key = SongKey::new(1, 1);
        backend.script_statuses(
            key,
            vec![
                Err(ApiError::Timeout),
                Err(ApiError::Network("reset".into())),
                Ok(SongStatus::Failed),
            ],
        );
        let poller = SongStatusPoller::new(
            fast_config(),
            Arc::new(backend.clone()),
            EventPublisher::new().arc(),
        );

        let outcome = poller
            .poll(&auth(&backend), key, &CancellationToken::new())
            .await;
        assert!(matches!(outcome, PollOutcome::Settled(s) if s.status() == SongStatus::Failed));
    }

    #[tokio::test]
    async fn test_not_found_aborts() {
        let backend = FakeBackendApi::new();
        let key = SongKey::new(1, 1);
        backend.script_statuses(key, vec![Err(ApiError::NotFound("session".into()))]);
        let poller = SongStatusPoller::new(
            fast_config(),
            Arc::new(backend.clone()),
            EventPublisher::new().arc(),
        );

        let outcome = poller
            .poll(&auth(&backend), key, &CancellationToken::new())
            .await;
        assert!(matches!(outcome, PollOutcome::Aborted(ApiError::NotFound(_))));
        assert_eq!(backend.status_calls(), 1);
    }

    #[tokio::test]
    async fn test_times_out_with_last_status() {
        let backend = FakeBackendApi::new();
        let key = SongKey::new(2, 2);
        backend.set_song_state(SongState::from_parts(
            SongStatus::InProgress,
            key,
            Default::default(),
        ));
        let config = SongPollerConfig {
            timeout: Duration::from_millis(40),
            ..fast_config()
        };
        let poller =
            SongStatusPoller::new(config, Arc::new(backend.clone()), EventPublisher::new().arc());

        let outcome = poller
            .poll(&auth(&backend), key, &CancellationToken::new())
            .await;
        assert!(matches!(
            outcome,
            PollOutcome::TimedOut(Some(SongStatus::InProgress))
        ));
    }

    #[tokio::test]
    async fn test_cancellation_stops_spawned_poll() {
        let backend = FakeBackendApi::new();
        let key = SongKey::new(3, 3);
        backend.set_song_state(SongState::from_parts(
            SongStatus::Requested,
            key,
            Default::default(),
        ));
        let events = EventPublisher::new().arc();
        let mut global = events.subscribe_global();
        let config = SongPollerConfig {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(60),
            max_backoff: Duration::from_secs(1),
        };
        let poller = Arc::new(SongStatusPoller::new(config, Arc::new(backend.clone()), events));

        let cancel = CancellationToken::new();
        let handle = poller.spawn(auth(&backend), key, cancel.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let outcome = handle.await.unwrap();
        assert!(matches!(outcome, PollOutcome::Cancelled));

        let mut finished = None;
        while let Ok(event) = global.try_recv() {
            if let AppEvent::SongPollFinished { outcome, .. } = event {
                finished = Some(outcome);
            }
        }
        assert_eq!(finished.as_deref(), Some("cancelled"));
    }

    #[test]
    fn test_backoff_is_capped() {
        let poller = SongStatusPoller::new(
            SongPollerConfig {
                interval: Duration::from_secs(1),
                timeout: Duration::from_secs(60),
                max_backoff: Duration::from_secs(5),
            },
            Arc::new(FakeBackendApi::new()),
            EventPublisher::new().arc(),
        );
        assert_eq!(poller.backoff(1), Duration::from_secs(1));
        assert_eq!(poller.backoff(3), Duration::from_secs(4));
        assert_eq!(poller.backoff(10), Duration::from_secs(5));
    }
}
