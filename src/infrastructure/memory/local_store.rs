//! In-Memory Local Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{LocalStorePort, StoreError, StoreKey};

/// 内存本地存储，测试与一次性命令使用
pub struct InMemoryLocalStore {
    values: DashMap<StoreKey, String>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for InMemoryLocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalStorePort for InMemoryLocalStore {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).map(|v| v.clone()))
    }

    async fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.values.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryLocalStore::new();
        store.set(StoreKey::SelectedChildId, "1").await.unwrap();
        store.set(StoreKey::SelectedChildId, "3").await.unwrap();
        assert_eq!(store.get_i64(StoreKey::SelectedChildId).await.unwrap(), Some(3));
        assert_eq!(store.len(), 1);

        store.remove(StoreKey::SelectedChildId).await.unwrap();
        assert!(store.is_empty());
    }
}
