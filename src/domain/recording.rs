//! Recording - 本地保存的发音录音

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 本地保存的录音元数据
///
/// 以 JSON 数组形式保存在 `savedRecordings` 键下
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecording {
    pub id: String,
    pub word: String,
    pub uri: String,
    pub recorded_at: DateTime<Utc>,
}

impl SavedRecording {
    pub fn new(word: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            word: word.into(),
            uri: uri.into(),
            recorded_at: Utc::now(),
        }
    }
}
