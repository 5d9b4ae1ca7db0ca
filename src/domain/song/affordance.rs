//! Song Context - 按状态决定界面操作

use serde::Serialize;

use super::SongStatus;

/// 童谣界面上可用的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SongAffordance {
    /// "만들기" 按钮
    Create,
    /// 禁用的加载按钮
    Busy,
    /// "저장하기" 按钮
    Save,
    /// 完整播放器
    Player,
    /// 失败后重新请求
    Retry,
}

impl SongAffordance {
    /// 该操作是否可点击
    pub fn is_enabled(&self) -> bool {
        !matches!(self, SongAffordance::Busy)
    }
}

/// 纯函数：只依赖状态
pub fn song_affordance(status: Option<SongStatus>) -> SongAffordance {
    match status {
        None | Some(SongStatus::None) => SongAffordance::Create,
        Some(SongStatus::Requested) | Some(SongStatus::InProgress) => SongAffordance::Busy,
        Some(SongStatus::Ready) => SongAffordance::Save,
        Some(SongStatus::Saved) => SongAffordance::Player,
        Some(SongStatus::Failed) => SongAffordance::Retry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_shows_player_only() {
        let affordance = song_affordance(Some(SongStatus::Saved));
        assert_eq!(affordance, SongAffordance::Player);
        assert_ne!(affordance, SongAffordance::Create);
        assert_ne!(affordance, SongAffordance::Save);
    }

    #[test]
    fn test_pending_is_disabled_busy() {
        for status in [SongStatus::Requested, SongStatus::InProgress] {
            let affordance = song_affordance(Some(status));
            assert_eq!(affordance, SongAffordance::Busy);
            assert!(!affordance.is_enabled());
        }
    }

    #[test]
    fn test_absent_and_none_create() {
        assert_eq!(song_affordance(None), SongAffordance::Create);
        assert_eq!(song_affordance(Some(SongStatus::None)), SongAffordance::Create);
        assert_eq!(song_affordance(Some(SongStatus::Ready)), SongAffordance::Save);
        assert_eq!(song_affordance(Some(SongStatus::Failed)), SongAffordance::Retry);
    }
}
