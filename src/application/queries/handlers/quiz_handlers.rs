//! Quiz Query Handlers

use std::sync::Arc;

use crate::application::credentials::Credentials;
use crate::application::error::ApplicationError;
use crate::application::ports::{ApiError, BackendApiPort, StoreKey};
use crate::application::queries::StartQuiz;
use crate::domain::quiz::{QuizError, QuizSession, QuizStart};

/// StartQuiz Handler
///
/// 记录 `currentSessionId` 后获取题目。已完成的测验直接返回 AlreadyCompleted。
pub struct StartQuizHandler {
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
}

impl StartQuizHandler {
    pub fn new(backend: Arc<dyn BackendApiPort>, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub async fn handle(&self, query: StartQuiz) -> Result<QuizStart, ApplicationError> {
        let auth = self.credentials.child_auth().await?;
        self.credentials
            .store()
            .set(StoreKey::CurrentSessionId, &query.session_id.to_string())
            .await?;

        let payload = self.backend.get_quiz(&auth, query.session_id).await?;
        if payload.is_completed {
            tracing::info!(session_id = query.session_id, "Quiz already completed");
            return Ok(QuizStart::AlreadyCompleted {
                session_id: query.session_id,
            });
        }

        let session = QuizSession::new(query.session_id, payload.quiz_id, payload.questions)
            .map_err(|e: QuizError| {
                tracing::error!(session_id = query.session_id, error = %e, "Malformed quiz");
                ApplicationError::from(ApiError::InvalidResponse(e.to_string()))
            })?;

        tracing::info!(
            session_id = query.session_id,
            quiz_id = ?session.quiz_id(),
            "Quiz started"
        );
        Ok(QuizStart::Ready(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{LocalStorePort, QuizPayload};
    use crate::domain::quiz::QuizQuestion;
    use crate::infrastructure::adapters::FakeBackendApi;
    use crate::infrastructure::memory::InMemoryLocalStore;

    fn questions(n: i64) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| {
                QuizQuestion::new(
                    i,
                    "https://cdn/q.png",
                    ["a", "b", "c", "d"].map(str::to_string),
                    "a",
                    0,
                )
            })
            .collect()
    }

    async fn handler(backend: FakeBackendApi) -> (StartQuizHandler, Arc<InMemoryLocalStore>) {
        let store = Arc::new(InMemoryLocalStore::new());
        store
            .set(StoreKey::AccessToken, &backend.access_token())
            .await
            .unwrap();
        store.set(StoreKey::SelectedChildId, "2").await.unwrap();
        (
            StartQuizHandler::new(Arc::new(backend), Credentials::new(store.clone())),
            store,
        )
    }

    #[tokio::test]
    async fn test_ready_quiz_persists_session() {
        let backend = FakeBackendApi::new().with_quiz(
            31,
            QuizPayload {
                quiz_id: Some(8),
                is_completed: false,
                questions: questions(4),
            },
        );
        let (handler, store) = handler(backend).await;

        let start = handler.handle(StartQuiz { session_id: 31 }).await.unwrap();
        match start {
            QuizStart::Ready(session) => {
                assert_eq!(session.current_index(), 0);
                assert_eq!(session.quiz_id(), Some(8));
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(store.get_i64(StoreKey::CurrentSessionId).await.unwrap(), Some(31));
    }

    #[tokio::test]
    async fn test_completed_quiz_short_circuits() {
        let backend = FakeBackendApi::new().with_quiz(
            5,
            QuizPayload {
                quiz_id: Some(1),
                is_completed: true,
                questions: Vec::new(),
            },
        );
        let (handler, _) = handler(backend).await;
        assert!(matches!(
            handler.handle(StartQuiz { session_id: 5 }).await.unwrap(),
            QuizStart::AlreadyCompleted { session_id: 5 }
        ));
    }

    #[tokio::test]
    async fn test_wrong_question_count_is_rejected() {
        let backend = FakeBackendApi::new().with_quiz(
            6,
            QuizPayload {
                quiz_id: None,
                is_completed: false,
                questions: questions(3),
            },
        );
        let (handler, _) = handler(backend).await;
        assert!(matches!(
            handler.handle(StartQuiz { session_id: 6 }).await,
            Err(ApplicationError::InternalError(_))
        ));
    }
}
