//! Dictionary Context - 学习会话

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Word;

/// 主题学习进度（含该儿童最近一次学习会话）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningTheme {
    pub theme_id: i64,
    pub theme_name: String,
    pub image_url: Option<String>,
    pub session_id: Option<i64>,
    pub started_at: Option<NaiveDateTime>,
    pub finished_at: Option<NaiveDateTime>,
    pub total_words: u32,
    pub learned_words: u32,
    /// 后端给出的进度百分比
    pub progress_rate: u8,
    pub is_finished: bool,
}

impl LearningTheme {
    /// 已开始但尚未学完
    pub fn is_in_progress(&self) -> bool {
        self.session_id.is_some() && !self.is_finished
    }
}

/// 一次主题学习会话，`words` 为本次抽到的单词卡
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningSession {
    pub session_id: i64,
    pub theme_ko: String,
    pub theme_en: String,
    pub words: Vec<Word>,
    /// 新建的会话（而不是继续已有会话）
    pub is_new: bool,
}

impl LearningSession {
    pub fn remaining_words(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().filter(|w| !w.is_learned)
    }

    pub fn is_complete(&self) -> bool {
        !self.words.is_empty() && self.words.iter().all(|w| w.is_learned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: i64, learned: bool) -> Word {
        Word {
            word_id: id,
            word_ko: "사과".into(),
            word_en: "apple".into(),
            img_url: None,
            tts_url: None,
            is_learned: learned,
        }
    }

    #[test]
    fn test_session_remaining_words() {
        let mut session = LearningSession {
            session_id: 7,
            theme_ko: "과일".into(),
            theme_en: "Fruits".into(),
            words: vec![word(1, true), word(2, false), word(3, false)],
            is_new: true,
        };
        let remaining: Vec<i64> = session.remaining_words().map(|w| w.word_id).collect();
        assert_eq!(remaining, vec![2, 3]);
        assert!(!session.is_complete());

        session.words.iter_mut().for_each(|w| w.is_learned = true);
        assert!(session.is_complete());
    }

    #[test]
    fn test_theme_in_progress() {
        let mut theme = LearningTheme {
            theme_id: 1,
            theme_name: "동물".into(),
            image_url: None,
            session_id: None,
            started_at: None,
            finished_at: None,
            total_words: 6,
            learned_words: 0,
            progress_rate: 0,
            is_finished: false,
        };
        assert!(!theme.is_in_progress());
        theme.session_id = Some(3);
        assert!(theme.is_in_progress());
        theme.is_finished = true;
        assert!(!theme.is_in_progress());
    }
}
