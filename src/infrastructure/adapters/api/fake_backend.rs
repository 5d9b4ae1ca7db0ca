//! Fake Backend - 用于测试与离线演示的内存后端
//!
//! 数据全部保存在内存中，童谣状态可以按顺序预先编排

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::ports::{
    ApiError, AuthContext, AuthToken, BackendApiPort, QuizPayload, SongRequest,
};
use crate::domain::dictionary::{LearningSession, LearningTheme, Storybook, Theme, Word};
use crate::domain::profile::{ChildProfile, NewChildProfile};
use crate::domain::quiz::AnswerSubmission;
use crate::domain::song::{
    SavedSong, SongDetail, SongKey, SongState, SongStateParts, SongStatus, SongSummary,
};
use crate::domain::voice::{SongVoiceSettings, TtsVoiceSettings, Voice, VoiceSettings};

#[derive(Default)]
struct FakeBackendState {
    access_token: String,
    children: Vec<ChildProfile>,
    registered_children: Vec<NewChildProfile>,
    next_child_id: i64,
    deleted_children: Vec<i64>,
    account_deleted: bool,
    storybooks: Vec<Storybook>,
    themes: Vec<Theme>,
    words: HashMap<i64, Vec<Word>>,
    learning_themes: Vec<LearningTheme>,
    /// session_id -> theme_id
    learning_sessions: HashMap<i64, i64>,
    next_session_id: i64,
    reshuffles: u32,
    songs: HashMap<SongKey, SongState>,
    status_script: HashMap<SongKey, VecDeque<Result<SongStatus, ApiError>>>,
    status_calls: u32,
    generated: Vec<SongRequest>,
    library: Vec<SongDetail>,
    quizzes: HashMap<i64, QuizPayload>,
    submissions: Vec<AnswerSubmission>,
    tts_settings: TtsVoiceSettings,
    song_settings: SongVoiceSettings,
    voice_updates: Vec<VoiceSettings>,
    next_voice_id: i64,
    fail_next: Option<ApiError>,
}

/// 内存后端
#[derive(Clone, Default)]
pub struct FakeBackendApi {
    state: Arc<Mutex<FakeBackendState>>,
}

impl FakeBackendApi {
    pub fn new() -> Self {
        let backend = Self::default();
        {
            let mut state = backend.lock();
            state.access_token = "fake-access-token".to_string();
            state.next_voice_id = 100;
            state.next_child_id = 500;
            state.next_session_id = 1;
        }
        backend
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, FakeBackendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 下一次调用返回该错误
    fn take_failure(&self) -> Result<(), ApiError> {
        match self.lock().fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ---- 编排 ----

    pub fn with_children(self, children: Vec<ChildProfile>) -> Self {
        self.lock().children = children;
        self
    }

    pub fn with_storybooks(self, storybooks: Vec<Storybook>) -> Self {
        self.lock().storybooks = storybooks;
        self
    }

    pub fn with_themes(self, themes: Vec<Theme>) -> Self {
        self.lock().themes = themes;
        self
    }

    pub fn with_words(self, theme_id: i64, words: Vec<Word>) -> Self {
        self.lock().words.insert(theme_id, words);
        self
    }

    pub fn with_learning_themes(self, themes: Vec<LearningTheme>) -> Self {
        self.lock().learning_themes = themes;
        self
    }

    pub fn with_quiz(self, session_id: i64, quiz: QuizPayload) -> Self {
        self.lock().quizzes.insert(session_id, quiz);
        self
    }

    pub fn with_song_library(self, songs: Vec<SongDetail>) -> Self {
        self.lock().library = songs;
        self
    }

    pub fn with_voice_settings(self, tts: TtsVoiceSettings, song: SongVoiceSettings) -> Self {
        {
            let mut state = self.lock();
            state.tts_settings = tts;
            state.song_settings = song;
        }
        self
    }

    /// 直接设置某首童谣的服务端状态
    pub fn set_song_state(&self, state: SongState) {
        self.lock().songs.insert(state.key(), state);
    }

    /// 预先编排状态查询的返回序列，耗尽后退回到存储的状态
    pub fn script_statuses(&self, key: SongKey, script: Vec<Result<SongStatus, ApiError>>) {
        self.lock()
            .status_script
            .insert(key, script.into_iter().collect());
    }

    pub fn fail_next(&self, error: ApiError) {
        self.lock().fail_next = Some(error);
    }

    // ---- 观察 ----

    pub fn access_token(&self) -> String {
        self.lock().access_token.clone()
    }

    pub fn submissions(&self) -> Vec<AnswerSubmission> {
        self.lock().submissions.clone()
    }

    pub fn generated(&self) -> Vec<SongRequest> {
        self.lock().generated.clone()
    }

    pub fn status_calls(&self) -> u32 {
        self.lock().status_calls
    }

    pub fn registered_children(&self) -> Vec<NewChildProfile> {
        self.lock().registered_children.clone()
    }

    pub fn reshuffles(&self) -> u32 {
        self.lock().reshuffles
    }

    pub fn deleted_children(&self) -> Vec<i64> {
        self.lock().deleted_children.clone()
    }

    pub fn account_deleted(&self) -> bool {
        self.lock().account_deleted
    }

    pub fn voice_updates(&self) -> Vec<VoiceSettings> {
        self.lock().voice_updates.clone()
    }

    fn check_token(&self, auth: &AuthContext) -> Result<(), ApiError> {
        if auth.access_token != self.lock().access_token {
            return Err(ApiError::Unauthorized("invalid token".to_string()));
        }
        Ok(())
    }

    fn check_child(&self, auth: &AuthContext) -> Result<(), ApiError> {
        auth.require_child()?;
        self.check_token(auth)
    }
}

/// 从主题的单词池生成会话，主题名取自已编排的主题列表
fn learning_session(
    state: &FakeBackendState,
    session_id: i64,
    theme_id: i64,
    is_new: bool,
) -> Result<LearningSession, ApiError> {
    let words = state
        .words
        .get(&theme_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("theme {}", theme_id)))?;
    let (theme_ko, theme_en) = state
        .themes
        .iter()
        .find(|t| t.theme_id == theme_id)
        .map(|t| (t.theme_ko.clone(), t.theme_en.clone()))
        .unwrap_or_default();
    Ok(LearningSession {
        session_id,
        theme_ko,
        theme_en,
        words,
        is_new,
    })
}

fn song_state(status: SongStatus, key: SongKey) -> SongState {
    let has_audio = status.has_audio();
    SongState::from_parts(
        status,
        key,
        SongStateParts {
            song_id: has_audio.then_some(key.session_id * 1000 + key.storybook_id),
            redis_key_exists: status != SongStatus::None,
            rdb_saved: status == SongStatus::Saved,
            song_url: has_audio.then(|| format!("https://cdn.aieng.test/songs/{}.mp3", key)),
            lyrics_ko: None,
            lyrics_en: has_audio.then(|| "Twinkle twinkle".to_string()),
        },
    )
}

#[async_trait]
impl BackendApiPort for FakeBackendApi {
    async fn login(&self, provider: &str, code: &str) -> Result<AuthToken, ApiError> {
        self.take_failure()?;
        if code.is_empty() {
            return Err(ApiError::Backend {
                status: 400,
                code: Some("AUTH001".to_string()),
                message: format!("empty {} code", provider),
            });
        }
        Ok(AuthToken {
            access_token: self.access_token(),
            is_new_user: false,
        })
    }

    async fn exchange_kakao_token(&self, kakao_access_token: &str) -> Result<AuthToken, ApiError> {
        self.login("kakao", kakao_access_token).await
    }

    async fn register_child(
        &self,
        auth: &AuthContext,
        child: &NewChildProfile,
    ) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_token(auth)?;
        let mut state = self.lock();
        let id = state.next_child_id;
        state.next_child_id += 1;
        let profile = ChildProfile::new(
            id,
            child.name(),
            Some(child.gender().code().to_string()),
            Some(child.birthdate()),
        )
        .map_err(|e| ApiError::Backend {
            status: 400,
            code: None,
            message: e.to_string(),
        })?;
        state.children.push(profile);
        state.registered_children.push(child.clone());
        Ok(())
    }

    async fn list_children(&self, auth: &AuthContext) -> Result<Vec<ChildProfile>, ApiError> {
        self.take_failure()?;
        self.check_token(auth)?;
        Ok(self.lock().children.clone())
    }

    async fn delete_child(&self, auth: &AuthContext, child_id: i64) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_token(auth)?;
        let mut state = self.lock();
        let before = state.children.len();
        state.children.retain(|c| c.id() != child_id);
        if state.children.len() == before {
            return Err(ApiError::NotFound(format!("child {}", child_id)));
        }
        state.deleted_children.push(child_id);
        Ok(())
    }

    async fn delete_account(&self, auth: &AuthContext) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_token(auth)?;
        self.lock().account_deleted = true;
        Ok(())
    }

    async fn list_storybooks(&self, auth: &AuthContext) -> Result<Vec<Storybook>, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self.lock().storybooks.clone())
    }

    async fn list_themes(&self, auth: &AuthContext) -> Result<Vec<Theme>, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self.lock().themes.clone())
    }

    async fn list_theme_words(
        &self,
        auth: &AuthContext,
        theme_id: i64,
    ) -> Result<Vec<Word>, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        self.lock()
            .words
            .get(&theme_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("theme {}", theme_id)))
    }

    async fn list_learning_themes(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<LearningTheme>, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self.lock().learning_themes.clone())
    }

    async fn start_theme_session(
        &self,
        auth: &AuthContext,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let session_id = state.next_session_id;
        let session = learning_session(&state, session_id, theme_id, true)?;
        state.next_session_id += 1;
        state.learning_sessions.insert(session_id, theme_id);
        Ok(session)
    }

    async fn reshuffle_theme_words(
        &self,
        auth: &AuthContext,
        session_id: i64,
        theme_id: i64,
    ) -> Result<LearningSession, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        if state.learning_sessions.get(&session_id) != Some(&theme_id) {
            return Err(ApiError::NotFound(format!(
                "session {} for theme {}",
                session_id, theme_id
            )));
        }
        state.reshuffles += 1;
        let mut session = learning_session(&state, session_id, theme_id, false)?;
        // 每次重抽把单词顺序轮转一位
        if !session.words.is_empty() {
            let shift = state.reshuffles as usize % session.words.len();
            session.words.rotate_left(shift);
        }
        Ok(session)
    }

    async fn song_status(&self, auth: &AuthContext, key: SongKey) -> Result<SongState, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        state.status_calls += 1;

        let scripted = state
            .status_script
            .get_mut(&key)
            .and_then(|queue| queue.pop_front());
        match scripted {
            Some(Ok(status)) => {
                let song = song_state(status, key);
                state.songs.insert(key, song.clone());
                Ok(song)
            }
            Some(Err(e)) => Err(e),
            None => Ok(state
                .songs
                .get(&key)
                .cloned()
                .unwrap_or_else(|| SongState::none(key))),
        }
    }

    async fn generate_song(&self, auth: &AuthContext, request: SongRequest) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        state.generated.push(request);
        state
            .songs
            .insert(request.key, song_state(SongStatus::Requested, request.key));
        Ok(())
    }

    async fn save_song(&self, auth: &AuthContext, key: SongKey) -> Result<SavedSong, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let current = state
            .songs
            .get(&key)
            .map(|s| s.status())
            .unwrap_or(SongStatus::None);
        if current != SongStatus::Ready {
            return Err(ApiError::Backend {
                status: 409,
                code: Some("SONG_NOT_READY".to_string()),
                message: format!("song is {}", current),
            });
        }
        let saved = song_state(SongStatus::Saved, key);
        let result = SavedSong {
            song_id: saved.song_id(),
            song_url: saved.song_url().map(str::to_string),
            title: Some(format!("Song {}", key)),
            lyric: saved.lyrics_en().map(str::to_string),
        };
        state.songs.insert(key, saved);
        Ok(result)
    }

    async fn list_songs(&self, auth: &AuthContext) -> Result<Vec<SongSummary>, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self
            .lock()
            .library
            .iter()
            .map(|s| SongSummary {
                song_id: s.song_id,
                title: s.title.clone(),
                created_at: None,
            })
            .collect())
    }

    async fn song_detail(&self, auth: &AuthContext, song_id: i64) -> Result<SongDetail, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        self.lock()
            .library
            .iter()
            .find(|s| s.song_id == song_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("song {}", song_id)))
    }

    async fn delete_song(&self, auth: &AuthContext, song_id: i64) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let before = state.library.len();
        state.library.retain(|s| s.song_id != song_id);
        if state.library.len() == before {
            return Err(ApiError::NotFound(format!("song {}", song_id)));
        }
        Ok(())
    }

    async fn toggle_song_like(&self, auth: &AuthContext, song_id: i64) -> Result<bool, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let song = state
            .library
            .iter_mut()
            .find(|s| s.song_id == song_id)
            .ok_or_else(|| ApiError::NotFound(format!("song {}", song_id)))?;
        song.is_liked = !song.is_liked;
        Ok(song.is_liked)
    }

    async fn get_quiz(&self, auth: &AuthContext, session_id: i64) -> Result<QuizPayload, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        self.lock()
            .quizzes
            .get(&session_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("quiz for session {}", session_id)))
    }

    async fn submit_answer(
        &self,
        auth: &AuthContext,
        submission: AnswerSubmission,
    ) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        self.lock().submissions.push(submission);
        Ok(())
    }

    async fn tts_voice_settings(&self, auth: &AuthContext) -> Result<TtsVoiceSettings, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self.lock().tts_settings.clone())
    }

    async fn song_voice_settings(&self, auth: &AuthContext) -> Result<SongVoiceSettings, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        Ok(self.lock().song_settings.clone())
    }

    async fn update_voice_settings(
        &self,
        auth: &AuthContext,
        settings: &VoiceSettings,
    ) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        self.lock().voice_updates.push(settings.clone());
        Ok(())
    }

    async fn register_voice_url(
        &self,
        auth: &AuthContext,
        name: &str,
        audio_url: &str,
    ) -> Result<Voice, ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let voice = Voice {
            id: state.next_voice_id,
            name: name.to_string(),
            description: None,
            audio_url: Some(audio_url.to_string()),
        };
        state.next_voice_id += 1;
        state.tts_settings.custom_voices.push(voice.clone());
        Ok(voice)
    }

    async fn delete_voice(&self, auth: &AuthContext, voice_id: i64) -> Result<(), ApiError> {
        self.take_failure()?;
        self.check_child(auth)?;
        let mut state = self.lock();
        let before = state.tts_settings.custom_voices.len();
        state.tts_settings.custom_voices.retain(|v| v.id != voice_id);
        if state.tts_settings.custom_voices.len() == before {
            return Err(ApiError::NotFound(format!("voice {}", voice_id)));
        }
        Ok(())
    }
}
