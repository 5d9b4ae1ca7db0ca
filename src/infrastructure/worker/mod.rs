//! Worker Layer - 后台任务
//!
//! 实现 SongStatusPoller，轮询童谣生成状态

mod song_status_poller;

pub use song_status_poller::{PollOutcome, SongPollerConfig, SongStatusPoller};
