//! Player Adapter - 音频播放器实现

mod cpal_player;
mod decoder;
mod fake_player;

pub use cpal_player::{CpalTrackPlayer, TrackCursor};
pub use decoder::{decode_track, read_track_info, DecodedTrack, TrackInfo};
pub use fake_player::FakeAudioPlayer;
