//! Dictionary Queries

/// 单词主题列表
#[derive(Debug, Clone)]
pub struct ListThemes;

/// 主题下的单词
#[derive(Debug, Clone)]
pub struct ListThemeWords {
    pub theme_id: i64,
}

/// 已生成的绘本列表
#[derive(Debug, Clone)]
pub struct ListStorybooks;
