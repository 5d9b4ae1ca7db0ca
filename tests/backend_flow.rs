//! 端到端测试：reqwest 客户端 + 处理器 对接 axum 假后端

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use aieng::application::ports::{BackendApiPort, LocalStorePort, StoreKey};
use aieng::application::{
    ApplicationError, CheckSongStatus, CheckSongStatusHandler, Credentials, ListLearningThemes,
    ListLearningThemesHandler, ListStorybooks, ListStorybooksHandler, ListThemes,
    ListThemesHandler, Login, LoginHandler, RegisterChild, RegisterChildHandler, ReshuffleWords,
    ReshuffleWordsHandler, SelectProfile, SelectProfileHandler, StartLearningSession,
    StartLearningSessionHandler, StartQuiz, StartQuizHandler, SubmitQuizAnswerHandler,
    ToggleSongLike, ToggleSongLikeHandler,
};
use aieng::domain::quiz::{QuizStart, QuizStep};
use aieng::domain::song::{SongAffordance, SongKey, SongStatus};
use aieng::infrastructure::adapters::{HttpBackendClient, HttpBackendConfig};
use aieng::infrastructure::{
    EventPublisher, InMemorySongStateCache, PollOutcome, SledLocalStore, SongPollerConfig,
    SongStatusPoller,
};

const TOKEN: &str = "stub-token";

/// 假后端记录的请求
#[derive(Default)]
struct StubState {
    child_headers: Vec<String>,
    submissions: Vec<Value>,
    status_calls: usize,
    requests: usize,
    registrations: Vec<(Value, bool)>,
    reshuffled: Vec<(i64, i64)>,
    liked: bool,
}

type Shared = Arc<Mutex<StubState>>;

fn ok(data: Value) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "data": data, "error": null })),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn record_child(state: &Shared, headers: &HeaderMap) {
    let mut guard = state.lock().unwrap();
    guard.requests += 1;
    if let Some(id) = headers.get("x-child-id").and_then(|v| v.to_str().ok()) {
        guard.child_headers.push(id.to_string());
    }
}

async fn login(Path(provider): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if provider != "kakao" || body["code"] != "auth-code" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": { "code": "A400", "message": "잘못된 코드" } })),
        );
    }
    ok(json!({ "accessToken": TOKEN, "user": { "isNew": true } }))
}

async fn children(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.lock().unwrap().requests += 1;
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "토큰 만료" })),
        );
    }
    ok(json!([
        { "childId": 1, "childName": "민지", "childGender": "FEMALE", "childBirthday": "2018-03-02" },
        { "childId": 2, "childName": "준호", "childGender": "MALE" }
    ]))
}

async fn register_child(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut guard = state.lock().unwrap();
    guard.requests += 1;
    guard
        .registrations
        .push((body, headers.contains_key("x-child-id")));
    ok(Value::Null)
}

fn session_body(session_id: i64, is_new: bool, first: &str) -> Value {
    let words: Vec<Value> = [first, "dog", "cat"]
        .iter()
        .enumerate()
        .map(|(i, en)| {
            json!({
                "wordId": i as i64 + 1,
                "wordEn": en,
                "wordKo": "",
                "wordImgUrl": format!("https://cdn.test/{}.png", en),
                "wordTtsUrl": null,
                "isLearned": i == 0
            })
        })
        .collect();
    json!({
        "sessionId": session_id,
        "themeEn": "Animals",
        "themeKo": "동물",
        "words": words,
        "new": is_new
    })
}

async fn learning_themes(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    ok(json!([
        {
            "themeId": 10, "themeName": "동물", "themeImgUrl": "https://cdn.test/animals.png",
            "sessionId": 77, "startedAt": "2025-05-01T09:30:00", "finishedAt": null,
            "totalWordCount": 8, "learnedWordCount": 3, "progressRate": 37.5, "isFinished": false
        },
        {
            "themeId": 11, "themeName": "과일", "themeImgUrl": null,
            "sessionId": null, "startedAt": null, "finishedAt": null,
            "totalWordCount": 8, "learnedWordCount": 0, "progressRate": 0, "isFinished": false
        }
    ]))
}

async fn start_session(
    State(state): State<Shared>,
    Path(theme_id): Path<i64>,
    headers: HeaderMap,
    Json(_body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    if theme_id != 10 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": { "code": "T404", "message": "테마 없음" } })),
        );
    }
    ok(session_body(77, true, "lion"))
}

async fn reshuffle(
    State(state): State<Shared>,
    Path((session_id, theme_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    state.lock().unwrap().reshuffled.push((session_id, theme_id));
    ok(session_body(session_id, false, "tiger"))
}

async fn like_toggle(
    State(state): State<Shared>,
    Path(_song_id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    let liked = {
        let mut guard = state.lock().unwrap();
        guard.liked = !guard.liked;
        guard.liked
    };
    ok(json!(liked))
}

async fn themes(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    ok(json!([
        { "themeId": 10, "themeKo": "동물", "themeEn": "Animals", "totalWords": 8, "learnedWords": 4 },
        { "themeId": 11, "themeKo": "과일", "themeEn": "Fruits", "totalWords": 8, "learnedWords": 8 }
    ]))
}

async fn books(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    (
        StatusCode::OK,
        Json(json!({ "success": false, "data": null, "error": "boom" })),
    )
}

async fn quiz(
    State(state): State<Shared>,
    Path(session_id): Path<i64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    if session_id == 99 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": { "code": "Q404", "message": "세션 없음" } })),
        );
    }
    let questions: Vec<Value> = (0..4)
        .map(|i| {
            json!({
                "id": 500 + i,
                "ansWord": "fish",
                "ansImageUrl": format!("https://cdn.test/q{}.png", i),
                "ch1Word": "cat",
                "ch2Word": "dog",
                "ch3Word": "bird",
                "ch4Word": "fish",
                "ansChId": 2
            })
        })
        .collect();
    ok(json!({ "quizId": 7, "isCompleted": session_id == 42, "questions": questions }))
}

async fn submit(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    state.lock().unwrap().submissions.push(body);
    ok(Value::Null)
}

async fn song_status(
    State(state): State<Shared>,
    Path((_session_id, _storybook_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    record_child(&state, &headers);
    let calls = {
        let mut guard = state.lock().unwrap();
        guard.status_calls += 1;
        guard.status_calls
    };
    match calls {
        1 => ok(json!({ "status": "REQUESTED" })),
        2 => ok(json!({ "status": "IN_PROGRESS", "redisKeyExists": true })),
        _ => ok(json!({
            "status": "READY",
            "songId": 31,
            "redisKeyExists": true,
            "songUrl": "https://cdn.test/song.mp3",
            "lyricsEn": "Twinkle"
        })),
    }
}

struct Harness {
    state: Shared,
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    store: Arc<dyn LocalStorePort>,
    _dir: tempfile::TempDir,
}

async fn start() -> Harness {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    let routes = Router::new()
        .route("/oauth/:provider", post(login))
        .route("/child", get(children).post(register_child))
        .route("/sessions/themes", get(learning_themes))
        .route("/sessions/themes/:theme_id/start", post(start_session))
        .route(
            "/sessions/:session_id/themes/:theme_id/reshuffle",
            post(reshuffle),
        )
        .route("/songs/:song_id/like-toggle", post(like_toggle))
        .route("/dictionaries/themes", get(themes))
        .route("/books", get(books))
        .route("/quiz/:session_id", get(quiz))
        .route("/quiz/submit", post(submit))
        .route(
            "/songs/sessions/:session_id/storybook/:storybook_id/status",
            get(song_status),
        )
        .with_state(state.clone());
    let app = Router::new().nest("/api", routes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = HttpBackendConfig::new(format!("http://{}/api/", addr)).with_timeout(5);
    let backend: Arc<dyn BackendApiPort> = Arc::new(HttpBackendClient::new(config).unwrap());

    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn LocalStorePort> = SledLocalStore::open(dir.path().join("store")).unwrap().arc();

    Harness {
        state,
        backend,
        credentials: Credentials::new(store.clone()),
        store,
        _dir: dir,
    }
}

async fn login_and_select(h: &Harness, child_id: i64) {
    LoginHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(Login {
            provider: "Kakao".to_string(),
            code: "auth-code".to_string(),
        })
        .await
        .unwrap();
    SelectProfileHandler::new(
        h.backend.clone(),
        h.credentials.clone(),
        EventPublisher::new().arc(),
    )
    .handle(SelectProfile { child_id })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_login_select_profile_and_list_themes() {
    let h = start().await;

    let token = LoginHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(Login {
            provider: "kakao".to_string(),
            code: "auth-code".to_string(),
        })
        .await
        .unwrap();
    assert!(token.is_new_user);
    assert_eq!(
        h.store.get(StoreKey::AccessToken).await.unwrap().as_deref(),
        Some(TOKEN)
    );

    let roster = SelectProfileHandler::new(
        h.backend.clone(),
        h.credentials.clone(),
        EventPublisher::new().arc(),
    )
    .handle(SelectProfile { child_id: 2 })
    .await
    .unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.active().map(|p| p.id()), Some(2));
    assert_eq!(
        roster.profiles().iter().filter(|p| p.is_active()).count(),
        1
    );

    let themes = ListThemesHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(ListThemes)
        .await
        .unwrap();
    assert_eq!(themes.len(), 2);
    assert_eq!(themes[0].theme_en, "Animals");
    assert_eq!(themes[0].progress_percent(), 50);
    assert!(themes[1].is_completed());

    let state = h.state.lock().unwrap();
    assert_eq!(state.child_headers, vec!["2".to_string()]);
}

#[tokio::test]
async fn test_child_request_fails_before_io_without_selection() {
    let h = start().await;
    h.store.set(StoreKey::AccessToken, TOKEN).await.unwrap();

    let err = ListThemesHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(ListThemes)
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Unauthenticated(_)));
    assert_eq!(h.state.lock().unwrap().requests, 0);
}

#[tokio::test]
async fn test_expired_token_maps_to_unauthenticated() {
    let h = start().await;
    h.store.set(StoreKey::AccessToken, "stale").await.unwrap();

    let err = SelectProfileHandler::new(
        h.backend.clone(),
        h.credentials.clone(),
        EventPublisher::new().arc(),
    )
    .handle(SelectProfile { child_id: 1 })
    .await
    .unwrap_err();
    assert!(matches!(err, ApplicationError::Unauthenticated(m) if m == "토큰 만료"));
    assert_eq!(h.store.get(StoreKey::SelectedChildId).await.unwrap(), None);
}

#[tokio::test]
async fn test_quiz_flow_submits_correct_choice_every_time() {
    let h = start().await;
    login_and_select(&h, 1).await;

    let start = StartQuizHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(StartQuiz { session_id: 5 })
        .await
        .unwrap();
    let mut session = match start {
        QuizStart::Ready(session) => session,
        other => panic!("unexpected: {:?}", other),
    };
    assert_eq!(
        h.store.get(StoreKey::CurrentSessionId).await.unwrap().as_deref(),
        Some("5")
    );

    let submitter = SubmitQuizAnswerHandler::new(
        h.backend.clone(),
        h.credentials.clone(),
        EventPublisher::new().arc(),
    );
    let picks = ["fish", "cat", "dog", "bird"];
    let mut steps = Vec::new();
    for pick in picks {
        session.select(pick).unwrap();
        steps.push(submitter.handle(&mut session).await.unwrap());
    }
    assert_eq!(
        steps,
        vec![
            QuizStep::Next { index: 1 },
            QuizStep::Next { index: 2 },
            QuizStep::Next { index: 3 },
            QuizStep::Finished,
        ]
    );
    assert!(session.is_finished());

    let state = h.state.lock().unwrap();
    assert_eq!(state.submissions.len(), 4);
    for (i, body) in state.submissions.iter().enumerate() {
        assert_eq!(body["quizQuestionId"], json!(500 + i as i64));
        assert_eq!(body["selectedChoiceId"], json!(2));
    }
}

#[tokio::test]
async fn test_completed_quiz_and_missing_session() {
    let h = start().await;
    login_and_select(&h, 1).await;
    let handler = StartQuizHandler::new(h.backend.clone(), h.credentials.clone());

    let completed = handler.handle(StartQuiz { session_id: 42 }).await.unwrap();
    assert!(matches!(
        completed,
        QuizStart::AlreadyCompleted { session_id: 42 }
    ));

    let err = handler.handle(StartQuiz { session_id: 99 }).await.unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(m) if m == "세션 없음"));
}

#[tokio::test]
async fn test_envelope_failure_with_ok_status() {
    let h = start().await;
    login_and_select(&h, 1).await;

    let err = ListStorybooksHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(ListStorybooks)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::BackendError { status: 200, message } if message == "boom"
    ));
}

#[tokio::test]
async fn test_song_status_check_and_poll_until_ready() {
    let h = start().await;
    login_and_select(&h, 1).await;
    let key = SongKey::new(5, 3);
    let cache = Arc::new(InMemorySongStateCache::new());
    let events = EventPublisher::new().arc();

    let check = CheckSongStatusHandler::new(
        h.backend.clone(),
        h.credentials.clone(),
        cache.clone(),
        events.clone(),
    );
    let view = check.handle(CheckSongStatus { key }).await.unwrap();
    assert_eq!(view.state.status(), SongStatus::Requested);
    assert_eq!(view.affordance, SongAffordance::Busy);

    let poller = SongStatusPoller::new(
        SongPollerConfig {
            interval: Duration::from_millis(10),
            timeout: Duration::from_secs(5),
            max_backoff: Duration::from_millis(50),
        },
        h.backend.clone(),
        events,
    );
    let auth = h.credentials.child_auth().await.unwrap();
    match poller.poll(&auth, key, &CancellationToken::new()).await {
        PollOutcome::Settled(state) => {
            assert_eq!(state.status(), SongStatus::Ready);
            assert_eq!(state.song_url(), Some("https://cdn.test/song.mp3"));
            assert_eq!(state.song_id(), Some(31));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(h.state.lock().unwrap().status_calls, 3);
}

#[tokio::test]
async fn test_learning_session_start_and_reshuffle() {
    let h = start().await;
    login_and_select(&h, 2).await;

    let themes = ListLearningThemesHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(ListLearningThemes)
        .await
        .unwrap();
    assert_eq!(themes.len(), 2);
    assert_eq!(themes[0].progress_rate, 38);
    assert!(themes[0].is_in_progress());
    assert!(!themes[1].is_in_progress());

    let session = StartLearningSessionHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(StartLearningSession { theme_id: 10 })
        .await
        .unwrap();
    assert!(session.is_new);
    assert_eq!(session.words[0].word_en, "lion");
    assert_eq!(session.remaining_words().count(), 2);
    assert_eq!(
        h.store.get(StoreKey::CurrentSessionId).await.unwrap().as_deref(),
        Some("77")
    );

    let reshuffled = ReshuffleWordsHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(ReshuffleWords {
            theme_id: 10,
            session_id: None,
        })
        .await
        .unwrap();
    assert_eq!(reshuffled.words[0].word_en, "tiger");

    let err = StartLearningSessionHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(StartLearningSession { theme_id: 12 })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::NotFound(m) if m == "테마 없음"));

    let state = h.state.lock().unwrap();
    assert_eq!(state.reshuffled, vec![(77, 10)]);
    assert!(state.child_headers.iter().all(|id| id == "2"));
}

#[tokio::test]
async fn test_register_child_posts_signup_body() {
    let h = start().await;
    h.store.set(StoreKey::AccessToken, TOKEN).await.unwrap();

    let roster = RegisterChildHandler::new(h.backend.clone(), h.credentials.clone())
        .handle(RegisterChild {
            name: "지우".to_string(),
            gender: "male".to_string(),
            birthdate: "2020-07-05".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(roster.len(), 2);

    let state = h.state.lock().unwrap();
    assert_eq!(state.registrations.len(), 1);
    let (body, had_child_header) = &state.registrations[0];
    assert_eq!(
        body,
        &json!({
            "childName": "지우",
            "childGender": "M",
            "childBirthdate": "2020-07-05",
            "childImgUrl": ""
        })
    );
    assert!(!had_child_header);
}

#[tokio::test]
async fn test_song_like_toggle_returns_server_state() {
    let h = start().await;
    login_and_select(&h, 1).await;
    let handler = ToggleSongLikeHandler::new(h.backend.clone(), h.credentials.clone());

    assert!(handler.handle(ToggleSongLike { song_id: 31 }).await.unwrap());
    assert!(!handler.handle(ToggleSongLike { song_id: 31 }).await.unwrap());
}
