//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 音色名称
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, VoiceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VoiceError::InvalidName("이름은 비어 있을 수 없습니다"));
        }
        if name.chars().count() > 50 {
            return Err(VoiceError::InvalidName("이름은 50자를 넘을 수 없습니다"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 童谣氛围
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub id: i64,
    pub name: String,
}

/// 儿童音色设置变更，未设置的字段保持不变
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts_voice_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_voice_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_id: Option<i64>,
}

impl VoiceSettings {
    pub fn validate(&self) -> Result<(), VoiceError> {
        if self.tts_voice_id.is_none() && self.song_voice_id.is_none() && self.mood_id.is_none() {
            return Err(VoiceError::EmptySettings);
        }
        Ok(())
    }
}
