//! Profile Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendApiPort, StoreKey};
use crate::application::queries::ListProfiles;
use crate::domain::profile::ProfileRoster;

/// ListProfiles Handler
///
/// 用本地保存的 `selectedChildId` 标记激活档案
pub struct ListProfilesHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl ListProfilesHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, _query: ListProfiles) -> Result<ProfileRoster, ApplicationError> {
        let auth = self.credentials.user_auth().await?;
        let children = self.backend.list_children(&auth).await?;
        let active_id = self
            .credentials
            .store()
            .get_i64(StoreKey::SelectedChildId)
            .await?;

        let roster = ProfileRoster::new(children, active_id);
        tracing::debug!(count = roster.len(), active = ?active_id, "Profiles listed");
        Ok(roster)
    }
}
