//! Recording Queries

/// 本地保存的录音
#[derive(Debug, Clone)]
pub struct ListRecordings;
