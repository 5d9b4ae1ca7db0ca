//! 后端 JSON 数据传输对象与领域模型之间的转换

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::application::ports::{ApiError, AuthToken, QuizPayload};
use crate::domain::dictionary::{LearningSession, LearningTheme, Storybook, Theme, Word};
use crate::domain::profile::{ChildProfile, NewChildProfile};
use crate::domain::quiz::QuizQuestion;
use crate::domain::song::{
    SavedSong, SongDetail, SongKey, SongState, SongStateParts, SongStatus, SongSummary,
};
use crate::domain::voice::{Mood, SongVoiceSettings, TtsVoiceSettings, Voice};

// ============================================================================
// 请求体
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OAuthCodeRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoTokenRequest<'a> {
    pub access_token: &'a str,
}

/// `POST /child` 请求体，头像未设置时发送空字符串
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChildRequest<'a> {
    pub child_name: &'a str,
    pub child_gender: &'static str,
    pub child_birthdate: String,
    pub child_img_url: &'a str,
}

impl<'a> From<&'a NewChildProfile> for RegisterChildRequest<'a> {
    fn from(child: &'a NewChildProfile) -> Self {
        Self {
            child_name: child.name(),
            child_gender: child.gender().code(),
            child_birthdate: child.birthdate().format("%Y-%m-%d").to_string(),
            child_img_url: child.image_url(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSongRequest {
    pub voice_id: i64,
    pub mood_id: i64,
    pub storybook_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceUrlRequest<'a> {
    pub name: &'a str,
    pub audio_url: &'a str,
}

// ============================================================================
// 认证
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<LoginUserDto>,
    #[serde(default)]
    pub is_new: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUserDto {
    #[serde(default)]
    pub is_new: Option<bool>,
}

impl LoginDto {
    pub fn into_token(self) -> Result<AuthToken, ApiError> {
        if self.access_token.is_empty() {
            return Err(ApiError::InvalidResponse("empty accessToken".to_string()));
        }
        let is_new_user = self
            .user
            .and_then(|u| u.is_new)
            .or(self.is_new)
            .unwrap_or(false);
        Ok(AuthToken {
            access_token: self.access_token,
            is_new_user,
        })
    }
}

// ============================================================================
// 档案
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDto {
    pub child_id: i64,
    pub child_name: String,
    #[serde(default)]
    pub child_gender: Option<String>,
    #[serde(default)]
    pub child_birthday: Option<String>,
}

impl ChildDto {
    /// 名字为空的档案无法显示，返回 None 由调用方跳过
    pub fn into_domain(self) -> Option<ChildProfile> {
        let birthday = self
            .child_birthday
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok());
        match ChildProfile::new(self.child_id, self.child_name, self.child_gender, birthday) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(child_id = self.child_id, error = %e, "Skipping invalid child profile");
                None
            }
        }
    }
}

// ============================================================================
// 词典 / 绘本
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDto {
    pub theme_id: i64,
    #[serde(default)]
    pub theme_ko: String,
    #[serde(default)]
    pub theme_en: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub total_words: u32,
    #[serde(default)]
    pub learned_words: u32,
}

impl From<ThemeDto> for Theme {
    fn from(dto: ThemeDto) -> Self {
        Theme {
            theme_id: dto.theme_id,
            theme_ko: dto.theme_ko,
            theme_en: dto.theme_en,
            image_url: dto.image_url,
            total_words: dto.total_words,
            learned_words: dto.learned_words,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDto {
    pub word_id: i64,
    #[serde(default)]
    pub word_ko: String,
    #[serde(default)]
    pub word_en: String,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub tts_url: Option<String>,
    #[serde(default)]
    pub is_learned: bool,
}

impl From<WordDto> for Word {
    fn from(dto: WordDto) -> Self {
        Word {
            word_id: dto.word_id,
            word_ko: dto.word_ko,
            word_en: dto.word_en,
            img_url: dto.img_url,
            tts_url: dto.tts_url,
            is_learned: dto.is_learned,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorybookDto {
    pub storybook_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
}

impl From<StorybookDto> for Storybook {
    fn from(dto: StorybookDto) -> Self {
        Storybook {
            storybook_id: dto.storybook_id,
            title: dto.title,
            cover: dto.cover_url,
            session_id: dto.session_id,
        }
    }
}

// ============================================================================
// 学习会话
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningThemeDto {
    pub theme_id: i64,
    #[serde(default)]
    pub theme_name: String,
    #[serde(default)]
    pub theme_img_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub total_word_count: u32,
    #[serde(default)]
    pub learned_word_count: u32,
    #[serde(default)]
    pub progress_rate: f64,
    #[serde(default)]
    pub is_finished: bool,
}

impl From<LearningThemeDto> for LearningTheme {
    fn from(dto: LearningThemeDto) -> Self {
        LearningTheme {
            theme_id: dto.theme_id,
            theme_name: dto.theme_name,
            image_url: dto.theme_img_url,
            session_id: dto.session_id,
            started_at: dto.started_at.as_deref().and_then(parse_timestamp),
            finished_at: dto.finished_at.as_deref().and_then(parse_timestamp),
            total_words: dto.total_word_count,
            learned_words: dto.learned_word_count,
            progress_rate: dto.progress_rate.round().clamp(0.0, 100.0) as u8,
            is_finished: dto.is_finished,
        }
    }
}

/// 会话中的单词卡，字段名与词典接口不同
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWordDto {
    pub word_id: i64,
    #[serde(default)]
    pub word_en: String,
    #[serde(default)]
    pub word_ko: String,
    #[serde(default)]
    pub word_img_url: Option<String>,
    #[serde(default)]
    pub word_tts_url: Option<String>,
    #[serde(default)]
    pub is_learned: bool,
}

impl From<SessionWordDto> for Word {
    fn from(dto: SessionWordDto) -> Self {
        Word {
            word_id: dto.word_id,
            word_ko: dto.word_ko,
            word_en: dto.word_en,
            img_url: dto.word_img_url,
            tts_url: dto.word_tts_url,
            is_learned: dto.is_learned,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSessionDto {
    pub session_id: i64,
    #[serde(default)]
    pub theme_en: String,
    #[serde(default)]
    pub theme_ko: String,
    #[serde(default)]
    pub words: Vec<SessionWordDto>,
    #[serde(default, rename = "new")]
    pub is_new: bool,
}

impl From<LearningSessionDto> for LearningSession {
    fn from(dto: LearningSessionDto) -> Self {
        LearningSession {
            session_id: dto.session_id,
            theme_ko: dto.theme_ko,
            theme_en: dto.theme_en,
            words: dto.words.into_iter().map(Word::from).collect(),
            is_new: dto.is_new,
        }
    }
}

// ============================================================================
// 童谣
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStatusDto {
    pub status: String,
    #[serde(default)]
    pub song_id: Option<i64>,
    #[serde(default)]
    pub redis_key_exists: bool,
    #[serde(default)]
    pub rdb_saved: bool,
    #[serde(default)]
    pub song_url: Option<String>,
    #[serde(default)]
    pub lyrics_ko: Option<String>,
    #[serde(default)]
    pub lyrics_en: Option<String>,
}

impl SongStatusDto {
    pub fn into_state(self, key: SongKey) -> Result<SongState, ApiError> {
        let status: SongStatus = self
            .status
            .parse()
            .map_err(|e: crate::domain::song::SongError| ApiError::InvalidResponse(e.to_string()))?;
        Ok(SongState::from_parts(
            status,
            key,
            SongStateParts {
                song_id: self.song_id,
                redis_key_exists: self.redis_key_exists,
                rdb_saved: self.rdb_saved,
                song_url: self.song_url,
                lyrics_ko: self.lyrics_ko,
                lyrics_en: self.lyrics_en,
            },
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSongDto {
    #[serde(default)]
    pub song_id: Option<i64>,
    #[serde(default)]
    pub song_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lyric: Option<String>,
}

impl From<SavedSongDto> for SavedSong {
    fn from(dto: SavedSongDto) -> Self {
        SavedSong {
            song_id: dto.song_id,
            song_url: dto.song_url,
            title: dto.title,
            lyric: dto.lyric,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongSummaryDto {
    #[serde(alias = "id")]
    pub song_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<SongSummaryDto> for SongSummary {
    fn from(dto: SongSummaryDto) -> Self {
        SongSummary {
            song_id: dto.song_id,
            title: dto.title,
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// `GET /songs` 可能直接返回数组，也可能包在 `songResponseList` 中
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SongListDto {
    Wrapped {
        #[serde(rename = "songResponseList")]
        songs: Vec<SongSummaryDto>,
    },
    Plain(Vec<SongSummaryDto>),
}

impl SongListDto {
    pub fn into_songs(self) -> Vec<SongSummary> {
        let songs = match self {
            SongListDto::Wrapped { songs } => songs,
            SongListDto::Plain(songs) => songs,
        };
        songs.into_iter().map(SongSummary::from).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetailDto {
    #[serde(alias = "id")]
    pub song_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub song_url: Option<String>,
    #[serde(default)]
    pub lyric: Option<String>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub theme_ko: Option<String>,
    #[serde(default)]
    pub theme_en: Option<String>,
    #[serde(default, alias = "coverUrl")]
    pub book_cover: Option<String>,
    #[serde(default)]
    pub mood_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<SongDetailDto> for SongDetail {
    fn from(dto: SongDetailDto) -> Self {
        SongDetail {
            song_id: dto.song_id,
            title: dto.title,
            song_url: dto.song_url,
            lyric: dto.lyric,
            is_liked: dto.is_liked,
            theme_ko: dto.theme_ko,
            theme_en: dto.theme_en,
            book_cover: dto.book_cover,
            mood_name: dto.mood_name,
            status: dto.status,
        }
    }
}

// ============================================================================
// 测验
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    #[serde(default)]
    pub quiz_id: Option<i64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub questions: Vec<QuizQuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionDto {
    pub id: i64,
    pub ans_word: String,
    #[serde(default)]
    pub ans_image_url: String,
    pub ch1_word: String,
    pub ch2_word: String,
    pub ch3_word: String,
    pub ch4_word: String,
    pub ans_ch_id: i32,
}

impl From<QuizQuestionDto> for QuizQuestion {
    fn from(dto: QuizQuestionDto) -> Self {
        QuizQuestion::new(
            dto.id,
            dto.ans_image_url,
            [dto.ch1_word, dto.ch2_word, dto.ch3_word, dto.ch4_word],
            dto.ans_word,
            dto.ans_ch_id,
        )
    }
}

impl From<QuizDto> for QuizPayload {
    fn from(dto: QuizDto) -> Self {
        QuizPayload {
            quiz_id: dto.quiz_id,
            is_completed: dto.is_completed,
            questions: dto.questions.into_iter().map(QuizQuestion::from).collect(),
        }
    }
}

// ============================================================================
// 音色
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDto {
    #[serde(alias = "voiceId")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl From<VoiceDto> for Voice {
    fn from(dto: VoiceDto) -> Self {
        Voice {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            audio_url: dto.audio_url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodDto {
    #[serde(alias = "moodId")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsSettingsDto {
    #[serde(default)]
    pub default_voices: Vec<VoiceDto>,
    #[serde(default)]
    pub custom_voices: Vec<VoiceDto>,
}

impl From<TtsSettingsDto> for TtsVoiceSettings {
    fn from(dto: TtsSettingsDto) -> Self {
        TtsVoiceSettings {
            default_voices: dto.default_voices.into_iter().map(Voice::from).collect(),
            custom_voices: dto.custom_voices.into_iter().map(Voice::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SongSettingsDto {
    #[serde(default)]
    pub moods: Vec<MoodDto>,
    #[serde(default)]
    pub voices: Vec<VoiceDto>,
}

impl From<SongSettingsDto> for SongVoiceSettings {
    fn from(dto: SongSettingsDto) -> Self {
        SongVoiceSettings {
            moods: dto
                .moods
                .into_iter()
                .map(|m| Mood {
                    id: m.id,
                    name: m.name,
                })
                .collect(),
            voices: dto.voices.into_iter().map(Voice::from).collect(),
        }
    }
}

/// 后端时间戳是无时区的 LocalDateTime
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
