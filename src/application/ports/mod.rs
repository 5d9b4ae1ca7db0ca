//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_player;
mod backend_api;
mod local_store;
mod song_state_cache;

pub use audio_player::{
    AudioMode, AudioPlayerPort, InterruptionMode, PlayerError, SoundHandle, SoundSource,
    SoundStatus,
};
pub use backend_api::{
    ApiError, AuthContext, AuthToken, BackendApiPort, QuizPayload, SongRequest,
};
pub use local_store::{LocalStorePort, StoreError, StoreKey};
pub use song_state_cache::SongStateCachePort;
