//! Profile Queries

/// 列出账户下的儿童档案
#[derive(Debug, Clone)]
pub struct ListProfiles;
