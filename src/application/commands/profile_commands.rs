//! Profile Commands

/// 选择儿童档案
#[derive(Debug, Clone)]
pub struct SelectProfile {
    pub child_id: i64,
}

/// 删除儿童档案
#[derive(Debug, Clone)]
pub struct DeleteProfile {
    pub child_id: i64,
}

/// 注销账户
#[derive(Debug, Clone)]
pub struct DeleteAccount;

/// 注册新的儿童档案
#[derive(Debug, Clone)]
pub struct RegisterChild {
    pub name: String,
    /// `M` / `F` / `male` / `female`
    pub gender: String,
    /// `YYYY-MM-DD`
    pub birthdate: String,
}
