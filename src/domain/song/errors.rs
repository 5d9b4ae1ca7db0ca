//! Song Context - Errors

use thiserror::Error;

use super::SongStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SongError {
    #[error("동요 생성을 요청할 수 없는 상태: {0}")]
    CannotRequest(SongStatus),

    #[error("동요를 저장할 수 없는 상태: {0}")]
    CannotSave(SongStatus),

    #[error("알 수 없는 동요 상태: {0}")]
    UnknownStatus(String),
}
