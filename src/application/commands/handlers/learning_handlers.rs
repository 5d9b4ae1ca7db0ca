//! Learning Command Handlers
//!
//! 会话 ID 保存在 `currentSessionId`，之后的例句、测验与童谣都按它请求

use std::sync::Arc;

use crate::application::commands::{ReshuffleWords, StartLearningSession};
use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendApiPort, StoreKey};
use crate::domain::dictionary::LearningSession;

// ============================================================================
// StartLearningSession
// ============================================================================

/// StartLearningSession Handler
pub struct StartLearningSessionHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl StartLearningSessionHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(
        &self,
        command: StartLearningSession,
    ) -> Result<LearningSession, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        let session = self
            .backend
            .start_theme_session(&auth, command.theme_id)
            .await?;

        self.credentials
            .store()
            .set(StoreKey::CurrentSessionId, &session.session_id.to_string())
            .await?;

        tracing::info!(
            theme_id = command.theme_id,
            session_id = session.session_id,
            words = session.words.len(),
            is_new = session.is_new,
            "Learning session started"
        );
        Ok(session)
    }
}

// ============================================================================
// ReshuffleWords
// ============================================================================

/// ReshuffleWords Handler
pub struct ReshuffleWordsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ReshuffleWordsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: ReshuffleWords) -> Result<LearningSession, ApplicationError> {
        let session_id = match command.session_id {
            Some(id) => id,
            None => self
                .credentials
                .store()
                .get_i64(StoreKey::CurrentSessionId)
                .await?
                .ok_or_else(|| ApplicationError::invalid_state("no current learning session"))?,
        };

        let auth = self.credentials.child_auth().await?;
        let session = self
            .backend
            .reshuffle_theme_words(&auth, session_id, command.theme_id)
            .await?;

        tracing::info!(
            theme_id = command.theme_id,
            session_id,
            words = session.words.len(),
            "Learning words reshuffled"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::LocalStorePort;
    use crate::domain::dictionary::{Theme, Word};
    use crate::infrastructure::adapters::FakeBackendApi;
    use crate::infrastructure::memory::InMemoryLocalStore;

    fn word(id: i64, en: &str) -> Word {
        Word {
            word_id: id,
            word_ko: String::new(),
            word_en: en.into(),
            img_url: None,
            tts_url: None,
            is_learned: false,
        }
    }

    async fn setup() -> (FakeBackendApi, Arc<InMemoryLocalStore>, Credentials) {
        let backend = FakeBackendApi::new()
            .with_themes(vec![Theme {
                theme_id: 2,
                theme_ko: "과일".into(),
                theme_en: "Fruits".into(),
                image_url: None,
                total_words: 3,
                learned_words: 0,
            }])
            .with_words(2, vec![word(1, "apple"), word(2, "banana"), word(3, "grape")]);
        let store = Arc::new(InMemoryLocalStore::new());
        store
            .set(StoreKey::AccessToken, &backend.access_token())
            .await
            .unwrap();
        store.set(StoreKey::SelectedChildId, "4").await.unwrap();
        let credentials = Credentials::new(store.clone());
        (backend, store, credentials)
    }

    #[tokio::test]
    async fn test_start_persists_current_session_id() {
        let (backend, store, credentials) = setup().await;
        let session = StartLearningSessionHandler::new(Arc::new(backend), credentials)
            .handle(StartLearningSession { theme_id: 2 })
            .await
            .unwrap();

        assert_eq!(session.theme_en, "Fruits");
        assert_eq!(session.words.len(), 3);
        assert_eq!(
            store.get_i64(StoreKey::CurrentSessionId).await.unwrap(),
            Some(session.session_id)
        );
    }

    #[tokio::test]
    async fn test_failed_start_keeps_previous_session() {
        let (backend, store, credentials) = setup().await;
        store.set(StoreKey::CurrentSessionId, "9").await.unwrap();

        let err = StartLearningSessionHandler::new(Arc::new(backend), credentials)
            .handle(StartLearningSession { theme_id: 77 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
        assert_eq!(store.get_i64(StoreKey::CurrentSessionId).await.unwrap(), Some(9));
    }

    #[tokio::test]
    async fn test_reshuffle_uses_stored_session() {
        let (backend, _store, credentials) = setup().await;
        let started = StartLearningSessionHandler::new(Arc::new(backend.clone()), credentials.clone())
            .handle(StartLearningSession { theme_id: 2 })
            .await
            .unwrap();

        let reshuffled = ReshuffleWordsHandler::new(Arc::new(backend.clone()), credentials)
            .handle(ReshuffleWords {
                theme_id: 2,
                session_id: None,
            })
            .await
            .unwrap();

        assert_eq!(reshuffled.session_id, started.session_id);
        assert!(!reshuffled.is_new);
        assert_ne!(reshuffled.words, started.words);
        assert_eq!(backend.reshuffles(), 1);
    }

    #[tokio::test]
    async fn test_reshuffle_without_session_is_invalid_state() {
        let (backend, _store, credentials) = setup().await;
        let err = ReshuffleWordsHandler::new(Arc::new(backend.clone()), credentials)
            .handle(ReshuffleWords {
                theme_id: 2,
                session_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
        assert_eq!(backend.reshuffles(), 0);
    }
}
