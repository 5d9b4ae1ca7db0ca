//! Song Commands

use crate::domain::song::SongKey;

/// 请求生成童谣
#[derive(Debug, Clone)]
pub struct CreateSong {
    pub key: SongKey,
    pub voice_id: i64,
    pub mood_id: i64,
}

/// 保存已生成的童谣
#[derive(Debug, Clone)]
pub struct SaveSong {
    pub key: SongKey,
}

/// 从童谣库删除
#[derive(Debug, Clone)]
pub struct DeleteSong {
    pub song_id: i64,
}

/// 切换童谣收藏状态
#[derive(Debug, Clone)]
pub struct ToggleSongLike {
    pub song_id: i64,
}
