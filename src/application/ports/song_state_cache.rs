//! Song State Cache Port - 本地已知的童谣状态
//!
//! 界面显示的状态以此为准，只在后端确认后更新

use crate::domain::song::{SongKey, SongState};

/// Song State Cache Port
pub trait SongStateCachePort: Send + Sync {
    /// 本地已知状态，未知时返回 None
    fn get(&self, key: SongKey) -> Option<SongState>;

    /// 写入并返回旧状态
    fn put(&self, state: SongState) -> Option<SongState>;

    fn remove(&self, key: SongKey);
}
