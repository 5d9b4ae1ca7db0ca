//! Song Context - 状态与详情

use serde::{Deserialize, Serialize};

use super::SongError;

/// 童谣生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SongStatus {
    /// 尚未请求
    None,
    /// 已点击生成并发出请求
    Requested,
    /// 生成服务处理中
    InProgress,
    /// 结果已到达缓存，可预览
    Ready,
    /// 已最终保存
    Saved,
    /// 生成失败（可重新请求）
    Failed,
}

impl SongStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SongStatus::None => "NONE",
            SongStatus::Requested => "REQUESTED",
            SongStatus::InProgress => "IN_PROGRESS",
            SongStatus::Ready => "READY",
            SongStatus::Saved => "SAVED",
            SongStatus::Failed => "FAILED",
        }
    }

    /// 终态：SAVED 与 FAILED
    pub fn is_terminal(&self) -> bool {
        matches!(self, SongStatus::Saved | SongStatus::Failed)
    }

    /// 生成中：REQUESTED 与 IN_PROGRESS
    pub fn is_pending(&self) -> bool {
        matches!(self, SongStatus::Requested | SongStatus::InProgress)
    }

    /// 是否允许携带 song_url
    pub fn has_audio(&self) -> bool {
        matches!(self, SongStatus::Ready | SongStatus::Saved)
    }
}

impl std::fmt::Display for SongStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SongStatus {
    type Err = SongError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(SongStatus::None),
            "REQUESTED" => Ok(SongStatus::Requested),
            "IN_PROGRESS" => Ok(SongStatus::InProgress),
            "READY" => Ok(SongStatus::Ready),
            "SAVED" => Ok(SongStatus::Saved),
            "FAILED" => Ok(SongStatus::Failed),
            other => Err(SongError::UnknownStatus(other.to_string())),
        }
    }
}

/// (session, storybook) 组合键，一首童谣对应一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongKey {
    pub session_id: i64,
    pub storybook_id: i64,
}

impl SongKey {
    pub fn new(session_id: i64, storybook_id: i64) -> Self {
        Self {
            session_id,
            storybook_id,
        }
    }
}

impl std::fmt::Display for SongKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.session_id, self.storybook_id)
    }
}

/// 童谣状态详情
///
/// 不变量:
/// - `song_url` 仅在 READY / SAVED 时非空
/// - `rdb_saved` 仅在 SAVED 时为 true
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongState {
    status: SongStatus,
    key: SongKey,
    song_id: Option<i64>,
    redis_key_exists: bool,
    rdb_saved: bool,
    song_url: Option<String>,
    lyrics_ko: Option<String>,
    lyrics_en: Option<String>,
}

/// 从后端返回的原始字段构造 SongState 时使用
#[derive(Debug, Clone, Default)]
pub struct SongStateParts {
    pub song_id: Option<i64>,
    pub redis_key_exists: bool,
    pub rdb_saved: bool,
    pub song_url: Option<String>,
    pub lyrics_ko: Option<String>,
    pub lyrics_en: Option<String>,
}

impl SongState {
    /// 尚未请求的初始状态
    pub fn none(key: SongKey) -> Self {
        Self {
            status: SongStatus::None,
            key,
            song_id: None,
            redis_key_exists: false,
            rdb_saved: false,
            song_url: None,
            lyrics_ko: None,
            lyrics_en: None,
        }
    }

    /// 由后端字段构造，违反不变量的字段会被修正
    pub fn from_parts(status: SongStatus, key: SongKey, parts: SongStateParts) -> Self {
        let mut song_url = parts.song_url;
        if song_url.is_some() && !status.has_audio() {
            tracing::warn!(
                key = %key,
                status = %status,
                "Dropping song_url reported for a status without audio"
            );
            song_url = None;
        }

        let mut rdb_saved = parts.rdb_saved;
        if rdb_saved && status != SongStatus::Saved {
            tracing::warn!(
                key = %key,
                status = %status,
                "Clearing rdb_saved reported for an unsaved song"
            );
            rdb_saved = false;
        }

        Self {
            status,
            key,
            song_id: parts.song_id,
            redis_key_exists: parts.redis_key_exists,
            rdb_saved,
            song_url,
            lyrics_ko: parts.lyrics_ko,
            lyrics_en: parts.lyrics_en,
        }
    }

    /// 生成请求已被后端确认
    pub fn mark_requested(&mut self) -> Result<(), SongError> {
        match self.status {
            SongStatus::None | SongStatus::Failed => {
                self.status = SongStatus::Requested;
                self.song_url = None;
                self.rdb_saved = false;
                Ok(())
            }
            other => Err(SongError::CannotRequest(other)),
        }
    }

    /// 保存已被后端确认
    pub fn mark_saved(
        &mut self,
        song_id: Option<i64>,
        song_url: Option<String>,
        lyrics: Option<String>,
    ) -> Result<(), SongError> {
        if self.status != SongStatus::Ready {
            return Err(SongError::CannotSave(self.status));
        }
        self.status = SongStatus::Saved;
        self.rdb_saved = true;
        if song_id.is_some() {
            self.song_id = song_id;
        }
        if song_url.is_some() {
            self.song_url = song_url;
        }
        if lyrics.is_some() {
            self.lyrics_en = lyrics;
        }
        Ok(())
    }

    // Getters
    pub fn status(&self) -> SongStatus {
        self.status
    }

    pub fn key(&self) -> SongKey {
        self.key
    }

    pub fn song_id(&self) -> Option<i64> {
        self.song_id
    }

    pub fn redis_key_exists(&self) -> bool {
        self.redis_key_exists
    }

    pub fn rdb_saved(&self) -> bool {
        self.rdb_saved
    }

    pub fn song_url(&self) -> Option<&str> {
        self.song_url.as_deref()
    }

    pub fn lyrics_ko(&self) -> Option<&str> {
        self.lyrics_ko.as_deref()
    }

    pub fn lyrics_en(&self) -> Option<&str> {
        self.lyrics_en.as_deref()
    }
}
