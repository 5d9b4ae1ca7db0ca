//! Auth Command Handlers

use std::sync::Arc;

use crate::application::commands::{ExchangeKakaoToken, Login, Logout};
use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{AuthToken, BackendApiPort, StoreKey};

/// 支持的 OAuth 提供方
const PROVIDERS: [&str; 3] = ["kakao", "naver", "google"];

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl LoginHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: Login) -> Result<AuthToken, ApplicationError> {
        let provider = command.provider.to_lowercase();
        if !PROVIDERS.contains(&provider.as_str()) {
            return Err(ApplicationError::validation(format!(
                "unsupported provider: {}",
                command.provider
            )));
        }
        if command.code.trim().is_empty() {
            return Err(ApplicationError::validation("authorization code is empty"));
        }

        let token = self.backend.login(&provider, &command.code).await?;
        self.credentials.save_token(&token.access_token).await?;

        tracing::info!(provider = %provider, new_user = token.is_new_user, "Logged in");
        Ok(token)
    }
}

// ============================================================================
// ExchangeKakaoToken
// ============================================================================

/// ExchangeKakaoToken Handler
pub struct ExchangeKakaoTokenHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ExchangeKakaoTokenHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: ExchangeKakaoToken) -> Result<AuthToken, ApplicationError> {
        if command.kakao_access_token.trim().is_empty() {
            return Err(ApplicationError::validation("kakao access token is empty"));
        }
        let token = self
            .backend
            .exchange_kakao_token(&command.kakao_access_token)
            .await?;
        self.credentials.save_token(&token.access_token).await?;

        tracing::info!(new_user = token.is_new_user, "Kakao token exchanged");
        Ok(token)
    }
}

// ============================================================================
// Logout
// ============================================================================

/// Logout Handler
///
/// 只清理本地凭证，不调用后端
pub struct LogoutHandler {
    credentials: Credentials,
}

impl LogoutHandler {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub async fn handle(&self, _command: Logout) -> Result<(), ApplicationError> {
        let store = self.credentials.store();
        for key in [
            StoreKey::AccessToken,
            StoreKey::SelectedChildId,
            StoreKey::CurrentSessionId,
        ] {
            store.remove(key).await?;
        }
        tracing::info!("Logged out");
        Ok(())
    }
}
