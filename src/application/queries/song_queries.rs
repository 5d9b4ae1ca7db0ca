//! Song Queries

use crate::domain::song::SongKey;

/// 查询某本绘本对应童谣的生成状态
#[derive(Debug, Clone)]
pub struct CheckSongStatus {
    pub key: SongKey,
}

/// 童谣库列表
#[derive(Debug, Clone)]
pub struct ListSongs;

/// 童谣详情
#[derive(Debug, Clone)]
pub struct GetSongDetail {
    pub song_id: i64,
}
