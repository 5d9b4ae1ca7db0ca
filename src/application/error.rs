//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{ApiError, StoreError};
use crate::domain::profile::ProfileError;
use crate::domain::quiz::QuizError;
use crate::domain::song::SongError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 本地没有凭证，或后端拒绝凭证（需要重新登录）
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// 资源未找到（如 session 已过期）
    #[error("Not found: {0}")]
    NotFound(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 后端返回错误
    #[error("Backend error (HTTP {status}): {message}")]
    BackendError { status: u16, message: String },

    /// 网络错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 本地存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建未认证错误
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {}", resource_type, id))
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 是否应引导用户重新登录
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthenticated(_))
    }
}

impl From<ApiError> for ApplicationError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(msg) => Self::Unauthenticated(msg),
            ApiError::NotFound(msg) => Self::NotFound(msg),
            ApiError::Backend {
                status, message, ..
            } => Self::BackendError { status, message },
            ApiError::Network(msg) => Self::NetworkError(msg),
            ApiError::Timeout => Self::NetworkError("request timed out".to_string()),
            ApiError::InvalidResponse(msg) => Self::InternalError(msg),
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<QuizError> for ApplicationError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::WrongQuestionCount(_) => Self::InternalError(err.to_string()),
            QuizError::UnknownOption(_) => Self::ValidationError(err.to_string()),
            _ => Self::InvalidState(err.to_string()),
        }
    }
}

impl From<SongError> for ApplicationError {
    fn from(err: SongError) -> Self {
        match err {
            SongError::UnknownStatus(_) => Self::InternalError(err.to_string()),
            _ => Self::InvalidState(err.to_string()),
        }
    }
}

impl From<ProfileError> for ApplicationError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(id) => Self::not_found("Profile", id),
            ProfileError::EmptyName
            | ProfileError::InvalidGender(_)
            | ProfileError::InvalidBirthdate(_) => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
