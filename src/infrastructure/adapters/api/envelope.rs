//! 后端统一响应信封
//!
//! `{ success, data: T | null, error: {code, message} | string | null }`

use serde::Deserialize;

use crate::application::ports::ApiError;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
}

/// 错误字段可能是对象或纯字符串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeError {
    Detailed {
        #[serde(default)]
        code: Option<String>,
        #[serde(default)]
        message: Option<String>,
    },
    Message(String),
}

impl EnvelopeError {
    pub fn code(&self) -> Option<String> {
        match self {
            EnvelopeError::Detailed { code, .. } => code.clone(),
            EnvelopeError::Message(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            EnvelopeError::Detailed { message, code } => message
                .clone()
                .or_else(|| code.clone())
                .unwrap_or_default(),
            EnvelopeError::Message(m) => m.clone(),
        }
    }
}

impl<T> Envelope<T> {
    /// 2xx 响应：success=false 视为后端错误
    pub fn into_result(self, status: u16) -> Result<Option<T>, ApiError> {
        if self.success {
            return Ok(self.data);
        }
        let (code, message) = match self.error {
            Some(e) => (e.code(), e.message()),
            None => (None, "success=false without error detail".to_string()),
        };
        Err(ApiError::Backend {
            status,
            code,
            message,
        })
    }

    /// 必须携带 data 的接口
    pub fn into_data(self, status: u16) -> Result<T, ApiError> {
        self.into_result(status)?
            .ok_or_else(|| ApiError::InvalidResponse("missing data".to_string()))
    }
}

/// 非 2xx 响应体：尽量从信封中取出错误信息
pub fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|env| env.error);

    let (code, message) = match parsed {
        Some(e) => (e.code(), e.message()),
        None => (None, body.trim().to_string()),
    };

    match status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(message),
        _ => ApiError::Backend {
            status,
            code,
            message,
        },
    }
}
