//! Profile Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{DeleteAccount, DeleteProfile, RegisterChild, SelectProfile};
use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{BackendApiPort, StoreKey};
use crate::domain::profile::{Gender, NewChildProfile, ProfileRoster};
use crate::infrastructure::events::EventPublisher;

// ============================================================================
// RegisterChild
// ============================================================================

/// RegisterChild Handler
///
/// 本地校验通过后才请求后端，返回包含新档案的列表
pub struct RegisterChildHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl RegisterChildHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: RegisterChild) -> Result<ProfileRoster, ApplicationError> {
        let gender: Gender = command.gender.parse()?;
        let child = NewChildProfile::new(
            command.name,
            gender,
            &command.birthdate,
            Utc::now().date_naive(),
        )?;

        let auth = self.credentials.user_auth().await?;
        self.backend.register_child(&auth, &child).await?;

        let children = self.backend.list_children(&auth).await?;
        let active_id = self
            .credentials
            .store()
            .get_i64(StoreKey::SelectedChildId)
            .await?;
        let roster = ProfileRoster::new(children, active_id);

        tracing::info!(count = roster.len(), "Child profile registered");
        Ok(roster)
    }
}

// ============================================================================
// SelectProfile
// ============================================================================

/// SelectProfile Handler
///
/// 确认档案存在后保存 `selectedChildId`，返回更新后的列表
pub struct SelectProfileHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    event_publisher: Arc<EventPublisher>,
}

impl SelectProfileHandler {
    pub fn new(
        backend: Arc<dyn BackendApiPort>,
        credentials: Credentials,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            backend,
            credentials,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: SelectProfile) -> Result<ProfileRoster, ApplicationError> {
        let auth = self.credentials.user_auth().await?;
        let children = self.backend.list_children(&auth).await?;
        let mut roster = ProfileRoster::new(children, None);
        let name = roster.select(command.child_id)?.name().to_string();

        self.credentials
            .store()
            .set(StoreKey::SelectedChildId, &command.child_id.to_string())
            .await?;
        self.event_publisher.publish_profile_selected(command.child_id);

        tracing::info!(child_id = command.child_id, name = %name, "Profile selected");
        Ok(roster)
    }
}

// ============================================================================
// DeleteProfile
// ============================================================================

/// DeleteProfile Handler
pub struct DeleteProfileHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl DeleteProfileHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, command: DeleteProfile) -> Result<(), ApplicationError> {
        let auth = self.credentials.user_auth().await?;
        self.backend.delete_child(&auth, command.child_id).await?;

        let store = self.credentials.store();
        if store.get_i64(StoreKey::SelectedChildId).await? == Some(command.child_id) {
            store.remove(StoreKey::SelectedChildId).await?;
            tracing::info!(child_id = command.child_id, "Cleared selection of deleted profile");
        }

        tracing::info!(child_id = command.child_id, "Profile deleted");
        Ok(())
    }
}

// ============================================================================
// DeleteAccount
// ============================================================================

/// DeleteAccount Handler
pub struct DeleteAccountHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl DeleteAccountHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, _command: DeleteAccount) -> Result<(), ApplicationError> {
        let auth = self.credentials.user_auth().await?;
        self.backend.delete_account(&auth).await?;

        let store = self.credentials.store();
        store.remove(StoreKey::AccessToken).await?;
        store.remove(StoreKey::SelectedChildId).await?;

        tracing::info!("Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::LocalStorePort;
    use crate::domain::profile::ChildProfile;
    use crate::infrastructure::adapters::FakeBackendApi;
    use crate::infrastructure::events::AppEvent;
    use crate::infrastructure::memory::InMemoryLocalStore;

    fn child(id: i64, name: &str) -> ChildProfile {
        ChildProfile::new(id, name, None, None).unwrap()
    }

    async fn setup() -> (FakeBackendApi, Arc<InMemoryLocalStore>, Credentials) {
        let backend = FakeBackendApi::new().with_children(vec![
            child(1, "민지"),
            child(2, "서준"),
            child(3, "하윤"),
        ]);
        let store = Arc::new(InMemoryLocalStore::new());
        store
            .set(StoreKey::AccessToken, &backend.access_token())
            .await
            .unwrap();
        let credentials = Credentials::new(store.clone());
        (backend, store, credentials)
    }

    #[tokio::test]
    async fn test_register_child_adds_profile() {
        let (backend, _store, credentials) = setup().await;
        let handler = RegisterChildHandler::new(Arc::new(backend.clone()), credentials);

        let roster = handler
            .handle(RegisterChild {
                name: "지우".into(),
                gender: "female".into(),
                birthdate: "2020-07-15".into(),
            })
            .await
            .unwrap();

        assert_eq!(roster.len(), 4);
        assert!(roster.profiles().iter().any(|p| p.name() == "지우"));
        let registered = backend.registered_children();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].gender(), Gender::Female);
    }

    #[tokio::test]
    async fn test_register_child_validates_before_request() {
        let (backend, _store, credentials) = setup().await;
        let handler = RegisterChildHandler::new(Arc::new(backend.clone()), credentials);

        for (name, gender, birthdate) in [
            ("", "M", "2020-07-15"),
            ("지우", "", "2020-07-15"),
            ("지우", "F", "2020-02-31"),
        ] {
            let err = handler
                .handle(RegisterChild {
                    name: name.into(),
                    gender: gender.into(),
                    birthdate: birthdate.into(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ApplicationError::ValidationError(_)));
        }
        assert!(backend.registered_children().is_empty());
    }

    #[tokio::test]
    async fn test_select_profile_single_active() {
        let (backend, store, credentials) = setup().await;
        let events = EventPublisher::new().arc();
        let mut rx = events.subscribe_global();
        let handler = SelectProfileHandler::new(Arc::new(backend), credentials, events);

        handler.handle(SelectProfile { child_id: 1 }).await.unwrap();
        let roster = handler.handle(SelectProfile { child_id: 2 }).await.unwrap();

        let active: Vec<i64> = roster
            .profiles()
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.id())
            .collect();
        assert_eq!(active, vec![2]);
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(2));
        assert_eq!(rx.recv().await.unwrap(), AppEvent::ProfileSelected { child_id: 1 });
    }

    #[tokio::test]
    async fn test_select_unknown_profile_keeps_selection() {
        let (backend, store, credentials) = setup().await;
        store.set(StoreKey::SelectedChildId, "3").await.unwrap();
        let handler =
            SelectProfileHandler::new(Arc::new(backend), credentials, EventPublisher::new().arc());

        let err = handler.handle(SelectProfile { child_id: 99 }).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_select_replaces_stale_stored_selection() {
        let (backend, store, credentials) = setup().await;
        store.set(StoreKey::SelectedChildId, "77").await.unwrap();
        let handler =
            SelectProfileHandler::new(Arc::new(backend), credentials, EventPublisher::new().arc());

        let roster = handler.handle(SelectProfile { child_id: 3 }).await.unwrap();
        assert_eq!(roster.active().map(|p| p.id()), Some(3));
        assert_eq!(roster.profiles().iter().filter(|p| p.is_active()).count(), 1);
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_delete_selected_profile_clears_selection() {
        let (backend, store, credentials) = setup().await;
        store.set(StoreKey::SelectedChildId, "2").await.unwrap();
        let handler = DeleteProfileHandler::new(Arc::new(backend.clone()), credentials);

        handler.handle(DeleteProfile { child_id: 1 }).await.unwrap();
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(2));

        handler.handle(DeleteProfile { child_id: 2 }).await.unwrap();
        assert_eq!(store.get(StoreKey::SelectedChildId).await.unwrap(), None);
        assert_eq!(backend.deleted_children(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_delete_account_removes_credentials() {
        let (backend, store, credentials) = setup().await;
        store.set(StoreKey::SelectedChildId, "2").await.unwrap();
        DeleteAccountHandler::new(Arc::new(backend.clone()), credentials)
            .handle(DeleteAccount)
            .await
            .unwrap();

        assert!(backend.account_deleted());
        assert_eq!(store.get(StoreKey::AccessToken).await.unwrap(), None);
        assert_eq!(store.get(StoreKey::SelectedChildId).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_account_without_token() {
        let store = Arc::new(InMemoryLocalStore::new());
        let err = DeleteAccountHandler::new(
            Arc::new(FakeBackendApi::new()),
            Credentials::new(store),
        )
        .handle(DeleteAccount)
        .await
        .unwrap_err();
        assert!(err.requires_login());
    }
}
