//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod auth_commands;
mod learning_commands;
mod profile_commands;
mod recording_commands;
mod song_commands;
mod voice_commands;

pub mod handlers;

pub use auth_commands::*;
pub use learning_commands::*;
pub use profile_commands::*;
pub use recording_commands::*;
pub use song_commands::*;
pub use voice_commands::*;
