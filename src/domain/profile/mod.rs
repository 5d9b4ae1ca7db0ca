//! Profile Context - 儿童档案限界上下文
//!
//! 职责:
//! - 已获取的档案列表
//! - 单一激活档案不变量
//! - 档案面板开关状态
//! - 新档案注册校验

mod aggregate;
mod errors;
mod registration;
mod sheet;

pub use aggregate::{ChildProfile, ProfileRoster};
pub use errors::ProfileError;
pub use registration::{Gender, NewChildProfile};
pub use sheet::ProfileSheet;
