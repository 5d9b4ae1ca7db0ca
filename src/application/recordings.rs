//! Recordings - 本地保存的发音录音列表
//!
//! 以 JSON 数组保存在 `savedRecordings` 键下，损坏的值按空列表处理

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{LocalStorePort, StoreKey};
use crate::domain::recording::SavedRecording;

#[derive(Clone)]
pub struct RecordingShelf {
    store: Arc<dyn LocalStorePort>,
}

impl RecordingShelf {
    pub fn new(store: Arc<dyn LocalStorePort>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Vec<SavedRecording>, ApplicationError> {
        let Some(raw) = self.store.get(StoreKey::SavedRecordings).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<SavedRecording>>(&raw) {
            Ok(recordings) => Ok(recordings),
            Err(e) => {
                tracing::warn!(error = %e, "Stored recordings are corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, recordings: &[SavedRecording]) -> Result<(), ApplicationError> {
        let raw = serde_json::to_string(recordings)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;
        self.store.set(StoreKey::SavedRecordings, &raw).await?;
        Ok(())
    }
}
