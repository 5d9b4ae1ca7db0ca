//! Profile Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("프로필을 찾을 수 없습니다: {0}")]
    NotFound(i64),

    #[error("프로필 이름이 비어 있습니다")]
    EmptyName,

    #[error("성별을 선택해주세요: {0}")]
    InvalidGender(String),

    #[error("올바른 생년월일을 입력해주세요: {0}")]
    InvalidBirthdate(String),
}
