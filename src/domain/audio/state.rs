//! Audio Context - 播放状态机
//!
//! Unloaded ──load──▶ LoadedPaused ◀──toggle/stop──▶ LoadedPlaying
//!     ▲                                                  │
//!     └──────────────────── cleanup ─────────────────────┘

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Unloaded,
    LoadedPaused,
    LoadedPlaying,
}

impl PlaybackState {
    pub fn from_flags(loaded: bool, playing: bool) -> Self {
        match (loaded, playing) {
            (false, _) => PlaybackState::Unloaded,
            (true, false) => PlaybackState::LoadedPaused,
            (true, true) => PlaybackState::LoadedPlaying,
        }
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self, PlaybackState::Unloaded)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::LoadedPlaying)
    }
}
