//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod dictionary_queries;
mod learning_queries;
mod profile_queries;
mod quiz_queries;
mod recording_queries;
mod song_queries;
mod voice_queries;

pub mod handlers;

pub use dictionary_queries::*;
pub use learning_queries::*;
pub use profile_queries::*;
pub use quiz_queries::*;
pub use recording_queries::*;
pub use song_queries::*;
pub use voice_queries::*;
