//! Dictionary Context - Entities

use serde::{Deserialize, Serialize};

/// 单词主题（如 Animals、Colors）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub theme_id: i64,
    pub theme_ko: String,
    pub theme_en: String,
    pub image_url: Option<String>,
    pub total_words: u32,
    pub learned_words: u32,
}

impl Theme {
    /// 学习进度百分比 (0-100)
    pub fn progress_percent(&self) -> u8 {
        if self.total_words == 0 {
            return 0;
        }
        let learned = self.learned_words.min(self.total_words);
        ((learned as u64 * 100) / self.total_words as u64) as u8
    }

    pub fn is_completed(&self) -> bool {
        self.total_words > 0 && self.learned_words >= self.total_words
    }
}

/// 单词卡
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word_id: i64,
    pub word_ko: String,
    pub word_en: String,
    pub img_url: Option<String>,
    pub tts_url: Option<String>,
    pub is_learned: bool,
}

/// 绘本（之后与生成的童谣配对）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storybook {
    pub storybook_id: i64,
    pub title: String,
    pub cover: Option<String>,
    pub session_id: Option<i64>,
}
