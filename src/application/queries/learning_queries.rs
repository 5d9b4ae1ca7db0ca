//! Learning Queries

/// 各主题的学习进度
#[derive(Debug, Clone)]
pub struct ListLearningThemes;
