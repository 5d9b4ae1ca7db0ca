//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod api;
pub mod player;

pub use api::*;
pub use player::*;
