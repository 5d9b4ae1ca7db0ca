//! Song Context - 童谣库

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 童谣列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
    pub song_id: i64,
    pub title: String,
    pub created_at: Option<NaiveDateTime>,
}

/// 童谣详情
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetail {
    pub song_id: i64,
    pub title: String,
    pub song_url: Option<String>,
    pub lyric: Option<String>,
    pub is_liked: bool,
    pub theme_ko: Option<String>,
    pub theme_en: Option<String>,
    pub book_cover: Option<String>,
    pub mood_name: Option<String>,
    pub status: Option<String>,
}

impl SongDetail {
    /// 播放器标题下方显示的文字，如 "동물 (Animals)"
    pub fn artist_label(&self) -> String {
        match (&self.theme_ko, &self.theme_en) {
            (Some(ko), Some(en)) if !en.is_empty() => format!("{} ({})", ko, en),
            (Some(ko), _) => ko.clone(),
            (None, Some(en)) => en.clone(),
            (None, None) => String::new(),
        }
    }
}

/// 保存成功后后端返回的童谣
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSong {
    pub song_id: Option<i64>,
    pub song_url: Option<String>,
    pub title: Option<String>,
    pub lyric: Option<String>,
}
