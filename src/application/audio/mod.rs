//! Audio - 背景音乐
//!
//! - AudioManager: 唯一的背景音乐资源
//! - BgmController: 面向界面的播放状态（原 AudioContext）

mod bgm;
mod manager;

pub use bgm::BgmController;
pub use manager::{AudioManager, StatusListener};
