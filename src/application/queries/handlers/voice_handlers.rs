//! Voice Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::BackendApiPort;
use crate::application::queries::{GetSongVoiceSettings, GetTtsVoiceSettings};
use crate::domain::voice::{SongVoiceSettings, TtsVoiceSettings};

/// GetTtsVoiceSettings Handler
pub struct GetTtsVoiceSettingsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl GetTtsVoiceSettingsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(
        &self,
        _query: GetTtsVoiceSettings,
    ) -> Result<TtsVoiceSettings, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.tts_voice_settings(&auth).await?)
    }
}

/// GetSongVoiceSettings Handler
pub struct GetSongVoiceSettingsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl GetSongVoiceSettingsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(
        &self,
        _query: GetSongVoiceSettings,
    ) -> Result<SongVoiceSettings, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.song_voice_settings(&auth).await?)
    }
}
