//! Quiz Command Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::BackendApiPort;
use crate::domain::quiz::{QuizSession, QuizStep};
use crate::infrastructure::events::EventPublisher;

/// SubmitQuizAnswer Handler
///
/// 提交当前题并前进。提交失败时游标不动，已选答案保留，可以重试。
/// 上报的选项编号固定为正确答案的编号。
pub struct SubmitQuizAnswerHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    event_publisher: Arc<EventPublisher>,
}

impl SubmitQuizAnswerHandler {
    pub fn new(
        backend: Arc<dyn BackendApiPort>,
        credentials: Credentials,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            backend,
            credentials,
            event_publisher,
        }
    }

    pub async fn handle(&self, session: &mut QuizSession) -> Result<QuizStep, ApplicationError> {
        let submission = session.submission()?;
        let auth = self.credentials.child_auth().await?;

        self.backend.submit_answer(&auth, submission).await?;
        let step = session.advance()?;

        tracing::info!(
            session_id = session.session_id(),
            question_id = submission.quiz_question_id,
            correct = ?session.last_correct(),
            step = ?step,
            "Quiz answer submitted"
        );

        if step == QuizStep::Finished {
            self.event_publisher.publish_quiz_finished(session.session_id());
        }
        Ok(step)
    }
}
