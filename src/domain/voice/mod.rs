//! Voice Context - TTS 音色限界上下文
//!
//! 职责:
//! - 默认音色与自定义音色
//! - 童谣氛围 (Mood)
//! - 儿童的音色设置

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{SongVoiceSettings, TtsVoiceSettings, Voice};
pub use errors::VoiceError;
pub use value_objects::{Mood, VoiceName, VoiceSettings};
