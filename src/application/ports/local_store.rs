//! Local Store Port - 设备本地键值存储
//!
//! 多个界面独立读写，没有锁，后写者胜出

use async_trait::async_trait;
use thiserror::Error;

/// Local Store 错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 持久化的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    AccessToken,
    SelectedChildId,
    CurrentSessionId,
    SavedRecordings,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::AccessToken => "accessToken",
            StoreKey::SelectedChildId => "selectedChildId",
            StoreKey::CurrentSessionId => "currentSessionId",
            StoreKey::SavedRecordings => "savedRecordings",
        }
    }

    pub fn all() -> [StoreKey; 4] {
        [
            StoreKey::AccessToken,
            StoreKey::SelectedChildId,
            StoreKey::CurrentSessionId,
            StoreKey::SavedRecordings,
        ]
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local Store Port
///
/// 值一律是字符串，与移动端 AsyncStorage 一致
#[async_trait]
pub trait LocalStorePort: Send + Sync {
    async fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: StoreKey) -> Result<(), StoreError>;

    /// 读取并解析为整数，无法解析时视为不存在
    async fn get_i64(&self, key: StoreKey) -> Result<Option<i64>, StoreError> {
        let value = self.get(key).await?;
        Ok(value.and_then(|v| match v.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!(key = %key, value = %v, "Ignoring non-numeric stored value");
                None
            }
        }))
    }
}
