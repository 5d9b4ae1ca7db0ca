//! Song Context - 童谣生成限界上下文
//!
//! 职责:
//! - 童谣生成生命周期 (NONE → REQUESTED → IN_PROGRESS → READY → SAVED / FAILED)
//! - 状态不变量校验
//! - 按状态决定界面可用操作
//! - 已保存的童谣库

mod affordance;
mod errors;
mod library;
mod status;

pub use affordance::{song_affordance, SongAffordance};
pub use errors::SongError;
pub use library::{SavedSong, SongDetail, SongSummary};
pub use status::{SongKey, SongState, SongStateParts, SongStatus};
