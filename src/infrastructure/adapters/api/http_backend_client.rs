//! HTTP Backend Client - 调用 AIENG REST 后端
//!
//! 实现 BackendApiPort trait。所有响应都包在统一信封中，
//! 需要儿童 ID 的接口在发出请求前校验凭证。

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::dto::{
    ChildDto, GenerateSongRequest, KakaoTokenRequest, LearningSessionDto, LearningThemeDto,
    LoginDto, OAuthCodeRequest, QuizDto, RegisterChildRequest, SavedSongDto, SongDetailDto,
    SongListDto, SongSettingsDto, SongStatusDto, StorybookDto, ThemeDto, TtsSettingsDto, VoiceDto,
    VoiceUrlRequest, WordDto,
};
use super::envelope::{error_from_body, Envelope};
use crate::application::ports::{
    ApiError, AuthContext, AuthToken, BackendApiPort, QuizPayload, SongRequest,
};
use crate::domain::dictionary::{LearningSession, LearningTheme, Storybook, Theme, Word};
use crate::domain::profile::{ChildProfile, NewChildProfile};
use crate::domain::quiz::AnswerSubmission;
use crate::domain::song::{SavedSong, SongDetail, SongKey, SongState, SongSummary};
use crate::domain::voice::{SongVoiceSettings, TtsVoiceSettings, Voice, VoiceSettings};

/// HTTP 后端客户端配置
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// 后端基础 URL（含 `/api`）
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.aieng.co.kr/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 后端客户端
pub struct HttpBackendClient {
    client: Client,
    base_url: String,
}

impl HttpBackendClient {
    pub fn new(config: HttpBackendConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("Cache-Control", "no-cache")
    }

    /// 附带 Bearer 令牌，存在儿童 ID 时附带 X-Child-Id
    fn authed(&self, method: Method, path: &str, auth: &AuthContext) -> RequestBuilder {
        let mut builder = self
            .request(method, path)
            .bearer_auth(&auth.access_token);
        if let Some(child_id) = auth.child_id {
            builder = builder.header("X-Child-Id", child_id.to_string());
        }
        builder
    }

    /// 需要儿童 ID 的请求，缺少时不发出请求
    fn child_request(
        &self,
        method: Method,
        path: &str,
        auth: &AuthContext,
    ) -> Result<RequestBuilder, ApiError> {
        auth.require_child()?;
        Ok(self.authed(method, path, auth))
    }

    /// 发送请求并解开信封；204 或空响应体返回 None
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>, ApiError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else if e.is_connect() {
                ApiError::Network(format!("Cannot connect to backend: {}", e))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), path = %url, "Backend returned error status");
            return Err(error_from_body(status.as_u16(), &body));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(None);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)))?;

        tracing::debug!(status = status.as_u16(), path = %url, success = envelope.success, "Backend response");
        envelope.into_result(status.as_u16())
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.send(builder)
            .await?
            .ok_or_else(|| ApiError::InvalidResponse("missing data".to_string()))
    }

    /// 只关心成功与否的请求
    async fn execute(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }
}

#[async_trait]
impl BackendApiPort for HttpBackendClient {
    async fn login(&self, provider: &str, code: &str) -> Result<AuthToken, ApiError> {
        tracing::info!(provider = %provider, "Logging in with OAuth code");
        let dto: LoginDto = self
            .fetch(
                self.request(Method::POST, &format!("/oauth/{}", provider))
                    .json(&OAuthCodeRequest { code }),
            )
            .await?;
        dto.into_token()
    }

    async fn exchange_kakao_token(&self, kakao_access_token: &str) -> Result<AuthToken, ApiError> {
        let dto: LoginDto = self
            .fetch(
                self.request(Method::POST, "/oauth/kakao/token")
                    .json(&KakaoTokenRequest {
                        access_token: kakao_access_token,
                    }),
            )
            .await?;
        dto.into_token()
    }

    async fn register_child(
        &self,
        auth: &AuthContext,
        child: &NewChildProfile,
    ) -> Result<(), ApiError> {
        tracing::info!(gender = child.gender().code(), "Registering child profile");
        self.execute(
            self.authed(Method::POST, "/child", auth)
                .json(&RegisterChildRequest::from(child)),
        )
        .await
    }

    async fn list_children(&self, auth: &AuthContext) -> Result<Vec<ChildProfile>, ApiError> {
        let children: Vec<ChildDto> = self
            .send(self.authed(Method::GET, "/child", auth))
            .await?
            .unwrap_or_default();
        Ok(children
            .into_iter()
            .filter_map(ChildDto::into_domain)
            .collect())
    }

    async fn delete_child(&self, auth: &AuthContext, child_id: i64) -> Result<(), ApiError> {
        self.execute(self.authed(Method::PUT, &format!("/child/{}/delete", child_id), auth))
            .await
    }

    async fn delete_account(&self, auth: &AuthContext) -> Result<(), ApiError> {
        self.execute(self.authed(Method::PUT, "/user/me", auth)).await
    }

    async fn list_storybooks(&self, auth: &AuthContext) -> Result<Vec<Storybook>, ApiError> {
        let books: Vec<StorybookDto> = self
            .send(self.child_request(Method::GET, "/books", auth)?)
            .await?
            .unwrap_or_default();
        Ok(books.into_iter().map(Storybook::from).collect())
    }

    async fn list_themes(&self, auth: &AuthContext) -> Result<Vec<Theme>, ApiError> {
        let themes: Vec<ThemeDto> = self
            .send(self.child_request(Method::GET, "/dictionaries/themes", auth)?)
            .await?
            .unwrap_or_default();
        Ok(themes.into_iter().map(Theme::from).collect())
    }

    async fn list_theme_words(
        &self,
        auth: &AuthContext,
        theme_id: i64,
    ) -> Result<Vec<Word>, ApiError> {
        let path = format!("/dictionaries/themes/{}/words", theme_id);
        let words: Vec<WordDto> = self
            .send(self.child_request(Method::GET, &path, auth)?)
            .await?
            .unwrap_or_default();
        Ok(words.into_iter().map(Word::from).collect())
    }

    async fn list_learning_themes(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<LearningTheme>, ApiError> {
        let themes: Vec<LearningThemeDto> = self
            .send(self.child_request(Method::GET, "/sessions/themes", auth)?)
            .await?
            .unwrap_or_default();
        Ok(themes.into_iter().map(LearningTheme::from).collect())
    }

    async fn start_theme_session(
        &self,
        auth: &AuthContext,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError> {
        let path = format!("/sessions/themes/{}/start", theme_id);
        let dto: LearningSessionDto = self
            .fetch(self.child_request(Method::POST, &path, auth)?.json(&serde_json::json!({})))
            .await?;
        Ok(dto.into())
    }

    async fn reshuffle_theme_words(
        &self,
        auth: &AuthContext,
        session_id: i64,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError> {
        let path = format!("/sessions/{}/themes/{}/reshuffle", session_id, theme_id);
        let dto: LearningSessionDto = self
            .fetch(self.child_request(Method::POST, &path, auth)?.json(&serde_json::json!({})))
            .await?;
        Ok(dto.into())
    }

    async fn song_status(&self, auth: &AuthContext, key: SongKey) -> Result<SongState, ApiError> {
        let path = format!(
            "/songs/sessions/{}/storybook/{}/status",
            key.session_id, key.storybook_id
        );
        let dto: Option<SongStatusDto> = self
            .send(self.child_request(Method::GET, &path, auth)?)
            .await?;
        match dto {
            Some(dto) => dto.into_state(key),
            None => Ok(SongState::none(key)),
        }
    }

    async fn generate_song(&self, auth: &AuthContext, request: SongRequest) -> Result<(), ApiError> {
        let path = format!("/songs/sessions/{}/generate-song", request.key.session_id);
        tracing::info!(
            key = %request.key,
            voice_id = request.voice_id,
            mood_id = request.mood_id,
            "Requesting song generation"
        );
        self.execute(
            self.child_request(Method::POST, &path, auth)?
                .json(&GenerateSongRequest {
                    voice_id: request.voice_id,
                    mood_id: request.mood_id,
                    storybook_id: request.key.storybook_id,
                }),
        )
        .await
    }

    async fn save_song(&self, auth: &AuthContext, key: SongKey) -> Result<SavedSong, ApiError> {
        let path = format!(
            "/songs/sessions/{}/storybooks/{}/save-song",
            key.session_id, key.storybook_id
        );
        let dto: Option<SavedSongDto> = self
            .send(self.child_request(Method::GET, &path, auth)?)
            .await?;
        Ok(dto.map(SavedSong::from).unwrap_or_default())
    }

    async fn list_songs(&self, auth: &AuthContext) -> Result<Vec<SongSummary>, ApiError> {
        let list: Option<SongListDto> = self
            .send(self.child_request(Method::GET, "/songs", auth)?)
            .await?;
        Ok(list.map(SongListDto::into_songs).unwrap_or_default())
    }

    async fn song_detail(&self, auth: &AuthContext, song_id: i64) -> Result<SongDetail, ApiError> {
        let dto: SongDetailDto = self
            .fetch(self.child_request(Method::GET, &format!("/songs/{}", song_id), auth)?)
            .await?;
        Ok(dto.into())
    }

    async fn delete_song(&self, auth: &AuthContext, song_id: i64) -> Result<(), ApiError> {
        self.execute(self.child_request(Method::DELETE, &format!("/songs/{}", song_id), auth)?)
            .await
    }

    async fn toggle_song_like(&self, auth: &AuthContext, song_id: i64) -> Result<bool, ApiError> {
        let path = format!("/songs/{}/like-toggle", song_id);
        self.fetch(self.child_request(Method::POST, &path, auth)?.json(&serde_json::json!({})))
            .await
    }

    async fn get_quiz(&self, auth: &AuthContext, session_id: i64) -> Result<QuizPayload, ApiError> {
        let dto: QuizDto = self
            .fetch(self.child_request(Method::GET, &format!("/quiz/{}", session_id), auth)?)
            .await?;
        Ok(dto.into())
    }

    async fn submit_answer(
        &self,
        auth: &AuthContext,
        submission: AnswerSubmission,
    ) -> Result<(), ApiError> {
        tracing::debug!(
            question_id = submission.quiz_question_id,
            choice = submission.selected_choice_id,
            "Submitting quiz answer"
        );
        self.execute(
            self.child_request(Method::POST, "/quiz/submit", auth)?
                .json(&submission),
        )
        .await
    }

    async fn tts_voice_settings(&self, auth: &AuthContext) -> Result<TtsVoiceSettings, ApiError> {
        let dto: TtsSettingsDto = self
            .fetch(self.child_request(Method::GET, "/voice/tts-settings", auth)?)
            .await?;
        Ok(dto.into())
    }

    async fn song_voice_settings(&self, auth: &AuthContext) -> Result<SongVoiceSettings, ApiError> {
        let dto: SongSettingsDto = self
            .fetch(self.child_request(Method::GET, "/voice/song-settings", auth)?)
            .await?;
        Ok(dto.into())
    }

    async fn update_voice_settings(
        &self,
        auth: &AuthContext,
        settings: &VoiceSettings,
    ) -> Result<(), ApiError> {
        self.execute(
            self.child_request(Method::PATCH, "/voice/settings", auth)?
                .json(settings),
        )
        .await
    }

    async fn register_voice_url(
        &self,
        auth: &AuthContext,
        name: &str,
        audio_url: &str,
    ) -> Result<Voice, ApiError> {
        let dto: VoiceDto = self
            .fetch(
                self.child_request(Method::POST, "/voice/voice-url", auth)?
                    .json(&VoiceUrlRequest { name, audio_url }),
            )
            .await?;
        Ok(dto.into())
    }

    async fn delete_voice(&self, auth: &AuthContext, voice_id: i64) -> Result<(), ApiError> {
        self.execute(self.child_request(Method::DELETE, &format!("/voice/{}", voice_id), auth)?)
            .await
    }
}
