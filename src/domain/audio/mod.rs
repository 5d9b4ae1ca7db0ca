//! Audio Context - 背景音乐播放状态

mod state;

pub use state::PlaybackState;
