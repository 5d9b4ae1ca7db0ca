//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoiceError {
    #[error("잘못된 목소리 이름: {0}")]
    InvalidName(&'static str),

    #[error("잘못된 목소리 주소: {0}")]
    InvalidAudioUrl(String),

    #[error("변경할 설정이 없습니다")]
    EmptySettings,
}
