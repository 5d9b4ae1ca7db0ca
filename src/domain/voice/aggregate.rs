//! Voice Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::Mood;

/// 音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub audio_url: Option<String>,
}

/// TTS 可选音色：默认男女声 + 儿童上传的自定义音色
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtsVoiceSettings {
    pub default_voices: Vec<Voice>,
    pub custom_voices: Vec<Voice>,
}

impl TtsVoiceSettings {
    pub fn all(&self) -> impl Iterator<Item = &Voice> {
        self.default_voices.iter().chain(self.custom_voices.iter())
    }

    pub fn find(&self, voice_id: i64) -> Option<&Voice> {
        self.all().find(|v| v.id == voice_id)
    }
}

/// 童谣生成可选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongVoiceSettings {
    pub moods: Vec<Mood>,
    pub voices: Vec<Voice>,
}
