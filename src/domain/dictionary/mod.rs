//! Dictionary Context - 主题、单词、绘本与学习会话
//!
//! 数据全部来自后端，学习会话由后端分配单词卡

mod entities;
mod learning;

pub use entities::{Storybook, Theme, Word};
pub use learning::{LearningSession, LearningTheme};
