//! Quiz Queries

/// 开始某个学习会话的测验
#[derive(Debug, Clone)]
pub struct StartQuiz {
    pub session_id: i64,
}
