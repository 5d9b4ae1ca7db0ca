//! Quiz Context - 题目

use serde::{Deserialize, Serialize};

/// 测验题目，获取后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    question_id: i64,
    image_url: String,
    options: [String; 4],
    correct_answer: String,
    correct_answer_index: i32,
}

impl QuizQuestion {
    pub fn new(
        question_id: i64,
        image_url: impl Into<String>,
        options: [String; 4],
        correct_answer: impl Into<String>,
        correct_answer_index: i32,
    ) -> Self {
        Self {
            question_id,
            image_url: image_url.into(),
            options,
            correct_answer: correct_answer.into(),
            correct_answer_index,
        }
    }

    /// 按字符串相等判断是否答对
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    // Getters
    pub fn question_id(&self) -> i64 {
        self.question_id
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// 后端的正确选项编号，提交时原样回传
    pub fn correct_answer_index(&self) -> i32 {
        self.correct_answer_index
    }
}
