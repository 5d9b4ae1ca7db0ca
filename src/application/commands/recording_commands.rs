//! Recording Commands

/// 保存一条发音录音
#[derive(Debug, Clone)]
pub struct AddRecording {
    pub word: String,
    pub uri: String,
}

/// 删除录音
#[derive(Debug, Clone)]
pub struct RemoveRecording {
    pub id: String,
}
