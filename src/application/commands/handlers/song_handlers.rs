//! Song Command Handlers
//!
//! 本地状态只在后端确认成功后才变更

use std::sync::Arc;

use crate::application::commands::{CreateSong, DeleteSong, SaveSong, ToggleSongLike};
use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendApiPort, SongRequest, SongStateCachePort};
use crate::domain::song::{SongError, SongKey, SongState, SongStatus};
use crate::infrastructure::events::EventPublisher;

fn known_state(cache: &dyn SongStateCachePort, key: SongKey) -> SongState {
    cache.get(key).unwrap_or_else(|| SongState::none(key))
}

// ============================================================================
// CreateSong
// ============================================================================

/// CreateSong Handler
pub struct CreateSongHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    song_states: Arc<dyn SongStateCachePort>,
    event_publisher: Arc<EventPublisher>,
}

impl CreateSongHandler {
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

    pub async fn handle(&self, command: CreateSong) -> Result<SongState, ApplicationError> {
        let key = command.key;
        let mut state = known_state(self.song_states.as_ref(), key);
        if !matches!(state.status(), SongStatus::None | SongStatus::Failed) {
            return Err(SongError::CannotRequest(state.status()).into());
        }

        let auth = self.credentials.child_auth().await?;
        self.backend
            .generate_song(
                &auth,
                SongRequest {
                    key,
                    voice_id: command.voice_id,
                    mood_id: command.mood_id,
                },
            )
            .await?;

        state.mark_requested()?;
        self.song_states.put(state.clone());
        self.event_publisher.publish_song_status(key, state.status());

        tracing::info!(
            key = %key,
            voice_id = command.voice_id,
            mood_id = command.mood_id,
            "Song generation requested"
        );
        Ok(state)
    }
}

// ============================================================================
// SaveSong
// ============================================================================

/// SaveSong Handler
pub struct SaveSongHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    song_states: Arc<dyn SongStateCachePort>,
    event_publisher: Arc<EventPublisher>,
}

impl SaveSongHandler {
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

    pub async fn handle(&self, command: SaveSong) -> Result<SongState, ApplicationError> {
        let key = command.key;
        let mut state = known_state(self.song_states.as_ref(), key);
        if state.status() != SongStatus::Ready {
            return Err(SongError::CannotSave(state.status()).into());
        }

        let auth = self.credentials.child_auth().await?;
        let saved = self.backend.save_song(&auth, key).await?;

        state.mark_saved(saved.song_id, saved.song_url, saved.lyric)?;
        self.song_states.put(state.clone());
        self.event_publisher.publish_song_status(key, state.status());

        tracing::info!(key = %key, song_id = ?state.song_id(), "Song saved");
        Ok(state)
    }
}

// ============================================================================
// DeleteSong
// ============================================================================

/// DeleteSong Handler
pub struct DeleteSongHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl DeleteSongHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: DeleteSong) -> Result<(), ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        self.backend.delete_song(&auth, command.song_id).await?;
        tracing::info!(song_id = command.song_id, "Song deleted");
        Ok(())
    }
}

// ============================================================================
// ToggleSongLike
// ============================================================================

/// ToggleSongLike Handler
///
/// 返回后端确认后的收藏状态
pub struct ToggleSongLikeHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ToggleSongLikeHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: ToggleSongLike) -> Result<bool, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        let liked = self.backend.toggle_song_like(&auth, command.song_id).await?;
        tracing::info!(song_id = command.song_id, liked, "Song like toggled");
        Ok(liked)
    }
}
