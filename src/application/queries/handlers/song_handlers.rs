//! Song Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendApiPort, SongStateCachePort};
use crate::application::queries::{CheckSongStatus, GetSongDetail, ListSongs};
use crate::domain::song::{song_affordance, SongAffordance, SongDetail, SongState, SongSummary};
use crate::infrastructure::events::EventPublisher;

// ============================================================================
// Response DTOs
// ============================================================================

/// 童谣状态与对应的界面操作
#[derive(Debug, Clone)]
pub struct SongStatusView {
    pub state: SongState,
    pub affordance: SongAffordance,
}

impl From<SongState> for SongStatusView {
    fn from(state: SongState) -> Self {
        let affordance = song_affordance(Some(state.status()));
        Self { state, affordance }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// CheckSongStatus Handler
///
/// 查询失败时本地状态保持不变，不自动重试
pub struct CheckSongStatusHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    song_states: Arc<dyn SongStateCachePort>,
    event_publisher: Arc<EventPublisher>,
}

impl CheckSongStatusHandler {
    pub fn new(
        backend: Arc<dyn BackendApiPort>,
        credentials: Credentials,
        song_states: Arc<dyn SongStateCachePort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            backend,
            credentials,
            song_states,
            event_publisher,
        }
    }

    pub async fn handle(&self, query: CheckSongStatus) -> Result<SongStatusView, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        let state = match self.backend.song_status(&auth, query.key).await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(key = %query.key, error = %e, "Song status check failed");
                return Err(e.into());
            }
        };

        let previous = self.song_states.put(state.clone());
        if previous.map(|p| p.status()) != Some(state.status()) {
            self.event_publisher
                .publish_song_status(query.key, state.status());
        }

        tracing::debug!(key = %query.key, status = %state.status(), "Song status checked");
        Ok(state.into())
    }
}

/// ListSongs Handler
pub struct ListSongsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListSongsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, _query: ListSongs) -> Result<Vec<SongSummary>, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.list_songs(&auth).await?)
    }
}

/// GetSongDetail Handler
pub struct GetSongDetailHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl GetSongDetailHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, query: GetSongDetail) -> Result<SongDetail, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.song_detail(&auth, query.song_id).await?)
    }
}
