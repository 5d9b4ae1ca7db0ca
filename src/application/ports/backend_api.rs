//! Backend API Port - 远端 REST 后端抽象
//!
//! 后端是外部协作者，具体实现在 infrastructure/adapters/api 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dictionary::{LearningSession, LearningTheme, Storybook, Theme, Word};
use crate::domain::profile::{ChildProfile, NewChildProfile};
use crate::domain::quiz::{AnswerSubmission, QuizQuestion};
use crate::domain::song::{SavedSong, SongDetail, SongKey, SongState, SongSummary};
use crate::domain::voice::{SongVoiceSettings, TtsVoiceSettings, Voice, VoiceSettings};

/// 后端调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backend error (HTTP {status}): {message}")]
    Backend {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// 网络层面的暂时性错误，可重试
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// 请求凭证
///
/// `Authorization: Bearer <token>` 与 `X-Child-Id: <id>` 的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub access_token: String,
    pub child_id: Option<i64>,
}

impl AuthContext {
    pub fn user(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            child_id: None,
        }
    }

    pub fn child(access_token: impl Into<String>, child_id: i64) -> Self {
        Self {
            access_token: access_token.into(),
            child_id: Some(child_id),
        }
    }

    /// 需要儿童 ID 的接口在发出请求前调用
    pub fn require_child(&self) -> Result<i64, ApiError> {
        self.child_id
            .ok_or_else(|| ApiError::Unauthorized("X-Child-Id is missing".to_string()))
    }
}

/// 登录成功返回的令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub access_token: String,
    pub is_new_user: bool,
}

/// 获取测验的原始结果
#[derive(Debug, Clone)]
pub struct QuizPayload {
    pub quiz_id: Option<i64>,
    pub is_completed: bool,
    pub questions: Vec<QuizQuestion>,
}

/// 童谣生成请求参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongRequest {
    pub key: SongKey,
    pub voice_id: i64,
    pub mood_id: i64,
}

/// Backend API Port
#[async_trait]
pub trait BackendApiPort: Send + Sync {
    // ---- 认证 ----

    /// `POST /oauth/{provider}`
    async fn login(&self, provider: &str, code: &str) -> Result<AuthToken, ApiError>;

    /// `POST /oauth/kakao/token`
    async fn exchange_kakao_token(&self, kakao_access_token: &str) -> Result<AuthToken, ApiError>;

    // ---- 档案 ----

    /// `POST /child`
    async fn register_child(&self, auth: &AuthContext, child: &NewChildProfile)
        -> Result<(), ApiError>;

    /// `GET /child`
    async fn list_children(&self, auth: &AuthContext) -> Result<Vec<ChildProfile>, ApiError>;

    /// `PUT /child/{id}/delete`
    async fn delete_child(&self, auth: &AuthContext, child_id: i64) -> Result<(), ApiError>;

    /// `PUT /user/me`
    async fn delete_account(&self, auth: &AuthContext) -> Result<(), ApiError>;

    // ---- 词典 / 绘本 ----

    /// `GET /books`
    async fn list_storybooks(&self, auth: &AuthContext) -> Result<Vec<Storybook>, ApiError>;

    /// `GET /dictionaries/themes`
    async fn list_themes(&self, auth: &AuthContext) -> Result<Vec<Theme>, ApiError>;

    /// `GET /dictionaries/themes/{themeId}/words`
    async fn list_theme_words(&self, auth: &AuthContext, theme_id: i64)
        -> Result<Vec<Word>, ApiError>;

    // ---- 学习会话 ----

    /// `GET /sessions/themes`
    async fn list_learning_themes(&self, auth: &AuthContext)
        -> Result<Vec<LearningTheme>, ApiError>;

    /// `POST /sessions/themes/{themeId}/start`
    async fn start_theme_session(
        &self,
        auth: &AuthContext,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError>;

    /// `POST /sessions/{sessionId}/themes/{themeId}/reshuffle`
    async fn reshuffle_theme_words(
        &self,
        auth: &AuthContext,
        session_id: i64,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError>;

    // ---- 童谣 ----

    /// `GET /songs/sessions/{sessionId}/storybook/{storybookId}/status`
    async fn song_status(&self, auth: &AuthContext, key: SongKey) -> Result<SongState, ApiError>;

    /// `POST /songs/sessions/{sessionId}/generate-song`
    async fn generate_song(&self, auth: &AuthContext, request: SongRequest) -> Result<(), ApiError>;

    /// `GET /songs/sessions/{sessionId}/storybooks/{storybookId}/save-song`
    async fn save_song(&self, auth: &AuthContext, key: SongKey) -> Result<SavedSong, ApiError>;

    /// `GET /songs`
    async fn list_songs(&self, auth: &AuthContext) -> Result<Vec<SongSummary>, ApiError>;

    /// `GET /songs/{songId}`
    async fn song_detail(&self, auth: &AuthContext, song_id: i64) -> Result<SongDetail, ApiError>;

    /// `DELETE /songs/{songId}`
    async fn delete_song(&self, auth: &AuthContext, song_id: i64) -> Result<(), ApiError>;

    /// `POST /songs/{songId}/like-toggle`，返回切换后的收藏状态
    async fn toggle_song_like(&self, auth: &AuthContext, song_id: i64) -> Result<bool, ApiError>;

    // ---- 测验 ----

    /// `GET /quiz/{sessionId}`
    async fn get_quiz(&self, auth: &AuthContext, session_id: i64) -> Result<QuizPayload, ApiError>;

    /// `POST /quiz/submit`
    async fn submit_answer(
        &self,
        auth: &AuthContext,
        submission: AnswerSubmission,
    ) -> Result<(), ApiError>;

    // ---- 音色 ----

    /// `GET /voice/tts-settings`
    async fn tts_voice_settings(&self, auth: &AuthContext) -> Result<TtsVoiceSettings, ApiError>;

    /// `GET /voice/song-settings`
    async fn song_voice_settings(&self, auth: &AuthContext) -> Result<SongVoiceSettings, ApiError>;

    /// `PATCH /voice/settings`
    async fn update_voice_settings(
        &self,
        auth: &AuthContext,
        settings: &VoiceSettings,
    ) -> Result<(), ApiError>;

    /// `POST /voice/voice-url`
    async fn register_voice_url(
        &self,
        auth: &AuthContext,
        name: &str,
        audio_url: &str,
    ) -> Result<Voice, ApiError>;

    /// `DELETE /voice/{voiceId}`
    async fn delete_voice(&self, auth: &AuthContext, voice_id: i64) -> Result<(), ApiError>;
}
