//! Voice Command Handlers

use std::sync::Arc;

use crate::application::commands::{DeleteVoice, RegisterVoiceUrl, UpdateVoiceSettings};
use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::BackendApiPort;
use crate::domain::voice::{Voice, VoiceError, VoiceName};

// ============================================================================
// UpdateVoiceSettings
// ============================================================================

/// UpdateVoiceSettings Handler
pub struct UpdateVoiceSettingsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl UpdateVoiceSettingsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: UpdateVoiceSettings) -> Result<(), ApplicationError> {
        command.settings.validate()?;
        let auth = self.credentials.child_auth().await?;
        self.backend
            .update_voice_settings(&auth, &command.settings)
            .await?;

        tracing::info!(settings = ?command.settings, "Voice settings updated");
        Ok(())
    }
}

// ============================================================================
// RegisterVoiceUrl
// ============================================================================

/// RegisterVoiceUrl Handler
pub struct RegisterVoiceUrlHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl RegisterVoiceUrlHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: RegisterVoiceUrl) -> Result<Voice, ApplicationError> {
        let name = VoiceName::new(command.name)?;
        let audio_url = command.audio_url.trim();
        if !(audio_url.starts_with("https://") || audio_url.starts_with("http://")) {
            return Err(VoiceError::InvalidAudioUrl(command.audio_url.clone()).into());
        }

        let auth = self.credentials.child_auth().await?;
        let voice = self
            .backend
            .register_voice_url(&auth, name.as_str(), audio_url)
            .await?;

        tracing::info!(voice_id = voice.id, name = %name, "Custom voice registered");
        Ok(voice)
    }
}

// ============================================================================
// DeleteVoice
// ============================================================================

/// DeleteVoice Handler
pub struct DeleteVoiceHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl DeleteVoiceHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: DeleteVoice) -> Result<(), ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        self.backend.delete_voice(&auth, command.voice_id).await?;
        tracing::info!(voice_id = command.voice_id, "Custom voice deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{LocalStorePort, StoreKey};
    use crate::domain::voice::VoiceSettings;
    use crate::infrastructure::adapters::FakeBackendApi;
    use crate::infrastructure::memory::InMemoryLocalStore;

    async fn credentials(backend: &FakeBackendApi) -> Credentials {
        let store = Arc::new(InMemoryLocalStore::new());
        store
            .set(StoreKey::AccessToken, &backend.access_token())
            .await
            .unwrap();
        store.set(StoreKey::SelectedChildId, "1").await.unwrap();
        Credentials::new(store)
    }

    #[tokio::test]
    async fn test_empty_settings_rejected_before_io() {
        let backend = FakeBackendApi::new();
        let handler =
            UpdateVoiceSettingsHandler::new(Arc::new(backend.clone()), credentials(&backend).await);

        let err = handler
            .handle(UpdateVoiceSettings {
                settings: VoiceSettings::default(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        handler
            .handle(UpdateVoiceSettings {
                settings: VoiceSettings {
                    mood_id: Some(3),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(backend.voice_updates().len(), 1);
    }

    #[tokio::test]
    async fn test_register_then_delete_voice() {
        let backend = FakeBackendApi::new();
        let creds = credentials(&backend).await;
        let register = RegisterVoiceUrlHandler::new(Arc::new(backend.clone()), creds.clone());

        let bad = register
            .handle(RegisterVoiceUrl {
                name: "엄마".into(),
                audio_url: "file:///tmp/a.wav".into(),
            })
            .await;
        assert!(matches!(bad, Err(ApplicationError::ValidationError(_))));

        let voice = register
            .handle(RegisterVoiceUrl {
                name: "엄마".into(),
                audio_url: "https://s3.aieng.test/voices/mom.wav".into(),
            })
            .await
            .unwrap();
        assert_eq!(voice.name, "엄마");

        let delete = DeleteVoiceHandler::new(Arc::new(backend), creds);
        delete.handle(DeleteVoice { voice_id: voice.id }).await.unwrap();
        assert!(matches!(
            delete.handle(DeleteVoice { voice_id: voice.id }).await,
            Err(ApplicationError::NotFound(_))
        ));
    }
}
