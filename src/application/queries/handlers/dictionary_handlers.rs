//! Dictionary Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::BackendApiPort;
use crate::application::queries::{ListStorybooks, ListThemeWords, ListThemes};
use crate::domain::dictionary::{Storybook, Theme, Word};

/// ListThemes Handler
pub struct ListThemesHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListThemesHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, _query: ListThemes) -> Result<Vec<Theme>, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.list_themes(&auth).await?)
    }
}

/// ListThemeWords Handler
pub struct ListThemeWordsHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListThemeWordsHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, query: ListThemeWords) -> Result<Vec<Word>, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        let words = self.backend.list_theme_words(&auth, query.theme_id).await?;
        tracing::debug!(
            theme_id = query.theme_id,
            total = words.len(),
            learned = words.iter().filter(|w| w.is_learned).count(),
            "Theme words listed"
        );
        Ok(words)
    }
}

/// ListStorybooks Handler
pub struct ListStorybooksHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListStorybooksHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, _query: ListStorybooks) -> Result<Vec<Storybook>, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        Ok(self.backend.list_storybooks(&auth).await?)
    }
}
