//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（BackendApi、LocalStore、AudioPlayer、SongStateCache）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - audio: 背景音乐管理
//! - error: 应用层错误定义

pub mod audio;
pub mod commands;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod queries;
pub mod recordings;

// Re-exports
pub use audio::{AudioManager, BgmController};
pub use commands::{
    // Auth commands
    ExchangeKakaoToken,
    Login,
    Logout,
    // Learning commands
    ReshuffleWords,
    StartLearningSession,
    // Profile commands
    DeleteAccount,
    DeleteProfile,
    RegisterChild,
    SelectProfile,
    // Recording commands
    AddRecording,
    RemoveRecording,
    // Song commands
    CreateSong,
    DeleteSong,
    SaveSong,
    ToggleSongLike,
    // Voice commands
    DeleteVoice,
    RegisterVoiceUrl,
    UpdateVoiceSettings,
    // Handlers
    handlers::{
        AddRecordingHandler, CreateSongHandler, DeleteAccountHandler, DeleteProfileHandler,
        DeleteSongHandler, DeleteVoiceHandler, ExchangeKakaoTokenHandler, LoginHandler,
        LogoutHandler, RegisterChildHandler, RegisterVoiceUrlHandler, RemoveRecordingHandler,
        ReshuffleWordsHandler, SaveSongHandler, SelectProfileHandler,
        StartLearningSessionHandler, SubmitQuizAnswerHandler, ToggleSongLikeHandler,
        UpdateVoiceSettingsHandler,
    },
};
pub use credentials::Credentials;
pub use error::ApplicationError;
pub use queries::{
    // Dictionary queries
    ListStorybooks,
    ListThemeWords,
    ListThemes,
    // Learning queries
    ListLearningThemes,
    // Profile queries
    ListProfiles,
    // Quiz queries
    StartQuiz,
    // Recording queries
    ListRecordings,
    // Song queries
    CheckSongStatus,
    GetSongDetail,
    ListSongs,
    // Voice queries
    GetSongVoiceSettings,
    GetTtsVoiceSettings,
    // Handlers
    handlers::{
        CheckSongStatusHandler, GetSongDetailHandler, GetSongVoiceSettingsHandler,
        GetTtsVoiceSettingsHandler, ListLearningThemesHandler, ListProfilesHandler,
        ListRecordingsHandler,
        ListSongsHandler, ListStorybooksHandler, ListThemeWordsHandler, ListThemesHandler,
        SongStatusView, StartQuizHandler,
    },
};
pub use recordings::RecordingShelf;
