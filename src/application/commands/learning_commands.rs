//! Learning Commands

/// 开始主题学习会话
#[derive(Debug, Clone)]
pub struct StartLearningSession {
    pub theme_id: i64,
}

/// 重新抽取本次会话的单词卡
///
/// `session_id` 为空时使用本地保存的 `currentSessionId`
#[derive(Debug, Clone)]
pub struct ReshuffleWords {
    pub theme_id: i64,
    pub session_id: Option<i64>,
}
