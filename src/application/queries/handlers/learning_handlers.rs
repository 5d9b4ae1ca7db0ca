//! Learning Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::BackendApiPort;
use crate::application::queries::ListLearningThemes;
use crate::domain::dictionary::LearningTheme;

/// ListLearningThemes Handler
pub struct ListLearningThemesHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListLearningThemesHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(
        &self,
        _query: ListLearningThemes,
    ) -> Result<Vec<LearningTheme>, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        let themes = self.backend.list_learning_themes(&auth).await?;
        tracing::debug!(
            total = themes.len(),
            finished = themes.iter().filter(|t| t.is_finished).count(),
            "Learning themes listed"
        );
        Ok(themes)
    }
}
