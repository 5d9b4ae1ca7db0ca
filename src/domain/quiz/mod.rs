//! Quiz Context - 单词测验限界上下文
//!
//! 职责:
//! - 测验题目（只读）
//! - 四道题的作答进度
//! - 提交内容的生成

mod errors;
mod question;
mod session;

pub use errors::QuizError;
pub use question::QuizQuestion;
pub use session::{AnswerFeedback, AnswerSubmission, QuizSession, QuizStart, QuizStep, QUIZ_LENGTH};
