//! Quiz Context - 作答进度

use serde::Serialize;

use super::{QuizError, QuizQuestion};

/// 每次测验固定题数
pub const QUIZ_LENGTH: usize = 4;

/// 获取测验后的起始结果
#[derive(Debug, Clone)]
pub enum QuizStart {
    /// 该 session 的测验已完成，不展示任何题目
    AlreadyCompleted { session_id: i64 },
    /// 可以开始作答
    Ready(QuizSession),
}

/// 选择答案后的客户端反馈
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub question_id: i64,
    pub selected: String,
    pub correct: bool,
    pub correct_answer: String,
}

/// 提交到后端的内容
///
/// `selected_choice_id` 总是题目的正确选项编号，与实际选择无关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub quiz_question_id: i64,
    pub selected_choice_id: i32,
}

/// 提交后的进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// 前进到下一题
    Next { index: usize },
    /// 最后一题已提交，可以生成童谣
    Finished,
}

/// 单次测验的作答状态
///
/// 不变量:
/// - 恰好 4 道题
/// - 只有当前题已作答并提交后游标才前进
#[derive(Debug, Clone)]
pub struct QuizSession {
    session_id: i64,
    quiz_id: Option<i64>,
    questions: Vec<QuizQuestion>,
    current: usize,
    answered: [bool; QUIZ_LENGTH],
    selected: Option<String>,
    last_correct: Option<bool>,
    finished: bool,
}

impl QuizSession {
    pub fn new(
        session_id: i64,
        quiz_id: Option<i64>,
        questions: Vec<QuizQuestion>,
    ) -> Result<Self, QuizError> {
        if questions.len() != QUIZ_LENGTH {
            return Err(QuizError::WrongQuestionCount(questions.len()));
        }
        Ok(Self {
            session_id,
            quiz_id,
            questions,
            current: 0,
            answered: [false; QUIZ_LENGTH],
            selected: None,
            last_correct: None,
            finished: false,
        })
    }

    /// 当前题目
    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    /// 选择答案，每题只接受第一次选择
    pub fn select(&mut self, option: &str) -> Result<AnswerFeedback, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        let question = &self.questions[self.current];
        if self.answered[self.current] {
            return Err(QuizError::AlreadyAnswered(question.question_id()));
        }
        if !question.has_option(option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        let correct = question.is_correct(option);
        let feedback = AnswerFeedback {
            question_id: question.question_id(),
            selected: option.to_string(),
            correct,
            correct_answer: question.correct_answer().to_string(),
        };

        self.answered[self.current] = true;
        self.selected = Some(option.to_string());
        self.last_correct = Some(correct);
        Ok(feedback)
    }

    /// 当前题的提交内容
    pub fn submission(&self) -> Result<AnswerSubmission, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        let question = &self.questions[self.current];
        if !self.answered[self.current] {
            return Err(QuizError::NotAnswered(question.question_id()));
        }
        Ok(AnswerSubmission {
            quiz_question_id: question.question_id(),
            selected_choice_id: question.correct_answer_index(),
        })
    }

    /// 提交成功后调用
    pub fn advance(&mut self) -> Result<QuizStep, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if !self.answered[self.current] {
            return Err(QuizError::NotAnswered(self.current_question().question_id()));
        }

        if self.current + 1 == QUIZ_LENGTH {
            self.finished = true;
            return Ok(QuizStep::Finished);
        }

        self.current += 1;
        self.selected = None;
        self.last_correct = None;
        Ok(QuizStep::Next {
            index: self.current,
        })
    }

    // Getters
    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn quiz_id(&self) -> Option<i64> {
        self.quiz_id
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_answered(&self) -> bool {
        self.answered[self.current]
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn last_correct(&self) -> Option<bool> {
        self.last_correct
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 最后一题提交后显示"생성하기"而非"다음 문제"
    pub fn can_create_song(&self) -> bool {
        self.finished
    }
}
