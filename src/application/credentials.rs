//! Credentials - 从本地存储读取请求凭证

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{AuthContext, LocalStorePort, StoreKey};

/// 凭证读取器
///
/// 每次请求前从本地存储读取，不做缓存
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn LocalStorePort>,
}

impl Credentials {
    pub fn new(store: Arc<dyn LocalStorePort>) -> Self {
        Self { store }
    }

    /// 只需要访问令牌
    pub async fn user_auth(&self) -> Result<AuthContext, ApplicationError> {
        let token = self.access_token().await?;
        Ok(AuthContext::user(token))
    }

    /// 需要访问令牌与已选择的儿童 ID
    pub async fn child_auth(&self) -> Result<AuthContext, ApplicationError> {
        let token = self.access_token().await?;
        let child_id = self
            .store
            .get_i64(StoreKey::SelectedChildId)
            .await?
            .ok_or_else(|| {
                tracing::warn!("No selected child id in local store");
                ApplicationError::unauthenticated("no child profile selected")
            })?;
        Ok(AuthContext::child(token, child_id))
    }

    pub async fn save_token(&self, access_token: &str) -> Result<(), ApplicationError> {
        self.store.set(StoreKey::AccessToken, access_token).await?;
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn LocalStorePort> {
        &self.store
    }

    async fn access_token(&self) -> Result<String, ApplicationError> {
        match self.store.get(StoreKey::AccessToken).await? {
            Some(token) if !token.is_empty() => Ok(token),
            _ => {
                tracing::warn!("No access token in local store");
                Err(ApplicationError::unauthenticated("no access token"))
            }
        }
    }
}
