//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod auth_handlers;
mod learning_handlers;
mod profile_handlers;
mod quiz_handlers;
mod recording_handlers;
mod song_handlers;
mod voice_handlers;

pub use auth_handlers::*;
pub use learning_handlers::*;
pub use profile_handlers::*;
pub use quiz_handlers::*;
pub use recording_handlers::*;
pub use song_handlers::*;
pub use voice_handlers::*;
