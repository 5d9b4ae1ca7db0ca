//! Sled-based Local Store Implementation
//!
//! 键值均以 UTF-8 字符串保存在 `store:` 前缀下

use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{LocalStorePort, StoreError, StoreKey};

const KEY_PREFIX: &str = "store:";

/// Sled 本地存储配置
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/aieng.sled".to_string(),
        }
    }
}

/// Sled 本地存储
pub struct SledLocalStore {
    db: Db,
}

impl SledLocalStore {
    pub fn new(config: &SledStoreConfig) -> Result<Self, StoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            entries = db.scan_prefix(KEY_PREFIX).count(),
            "SledLocalStore initialized"
        );

        Ok(Self { db })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::new(&SledStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn db_key(key: StoreKey) -> String {
        format!("{}{}", KEY_PREFIX, key.as_str())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LocalStorePort for SledLocalStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        let value = self
            .db
            .get(Self::db_key(key))
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;

        match value {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| StoreError::SerializationError(e.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.db
            .insert(Self::db_key(key), value.as_bytes())
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        self.flush()?;
        tracing::debug!(key = %key, "Stored value");
        Ok(())
    }

    async fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.db
            .remove(Self::db_key(key))
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        self.flush()?;
        tracing::debug!(key = %key, "Removed value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let store = SledLocalStore::open(dir.path().join("store.sled")).unwrap();

        assert_eq!(store.get(StoreKey::AccessToken).await.unwrap(), None);

        store.set(StoreKey::AccessToken, "jwt-token").await.unwrap();
        assert_eq!(
            store.get(StoreKey::AccessToken).await.unwrap().as_deref(),
            Some("jwt-token")
        );

        store.remove(StoreKey::AccessToken).await.unwrap();
        assert_eq!(store.get(StoreKey::AccessToken).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.sled");
        {
            let store = SledLocalStore::open(&path).unwrap();
            store.set(StoreKey::SelectedChildId, "42").await.unwrap();
        }
        let store = SledLocalStore::open(&path).unwrap();
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_last_writer_wins_and_non_numeric() {
        let dir = tempdir().unwrap();
        let store = SledLocalStore::open(dir.path().join("store.sled")).unwrap();

        store.set(StoreKey::CurrentSessionId, "1").await.unwrap();
        store.set(StoreKey::CurrentSessionId, "2").await.unwrap();
        assert_eq!(store.get_i64(StoreKey::CurrentSessionId).await.unwrap(), Some(2));

        store.set(StoreKey::CurrentSessionId, "abc").await.unwrap();
        assert_eq!(store.get_i64(StoreKey::CurrentSessionId).await.unwrap(), None);
    }
}
