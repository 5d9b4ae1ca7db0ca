//! Voice Queries

/// 单词朗读可选音色
#[derive(Debug, Clone)]
pub struct GetTtsVoiceSettings;

/// 童谣生成可选音色与氛围
#[derive(Debug, Clone)]
pub struct GetSongVoiceSettings;
