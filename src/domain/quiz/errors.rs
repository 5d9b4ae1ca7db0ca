//! Quiz Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("퀴즈 문제 수가 올바르지 않습니다: {0}")]
    WrongQuestionCount(usize),

    #[error("이미 답을 선택했습니다: 문제 {0}")]
    AlreadyAnswered(i64),

    #[error("아직 답을 선택하지 않았습니다: 문제 {0}")]
    NotAnswered(i64),

    #[error("보기에 없는 답입니다: {0}")]
    UnknownOption(String),

    #[error("이미 모든 문제를 풀었습니다")]
    Finished,
}
