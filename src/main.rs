//! AIENG - 儿童英语学习应用核心
//!
//! 组合根：加载配置、初始化日志、装配适配器，然后执行一个命令行操作。

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use aieng::application::ports::{AudioMode, BackendApiPort, LocalStorePort, SongStateCachePort};
use aieng::application::{
    AudioManager, BgmController, CheckSongStatus, CheckSongStatusHandler, CreateSong,
    CreateSongHandler, Credentials, ListLearningThemes, ListLearningThemesHandler, ListProfiles,
    ListProfilesHandler, ListStorybooks, ListStorybooksHandler, ListThemeWords,
    ListThemeWordsHandler, ListThemes, ListThemesHandler, Login, LoginHandler, Logout,
    LogoutHandler, RegisterChild, RegisterChildHandler, ReshuffleWords, ReshuffleWordsHandler,
    SelectProfile, SelectProfileHandler, StartLearningSession, StartLearningSessionHandler,
    StartQuiz, StartQuizHandler, SubmitQuizAnswerHandler, ToggleSongLike, ToggleSongLikeHandler,
};
use aieng::domain::dictionary::LearningSession;
use aieng::config::{load_config, load_config_from_path, print_config, AppConfig};
use aieng::domain::quiz::{QuizStart, QuizStep};
use aieng::domain::song::SongKey;
use aieng::infrastructure::adapters::{CpalTrackPlayer, HttpBackendClient};
use aieng::infrastructure::{
    EventPublisher, InMemorySongStateCache, PollOutcome, SledLocalStore, SongStatusPoller,
};

#[derive(Debug, Parser)]
#[command(name = "aieng", version, about = "AIENG learning app core")]
struct Cli {
    /// 配置文件路径，缺省时搜索 config.toml / config.local.toml
    #[arg(long, env = "AIENG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// OAuth 授权码登录
    Login {
        #[arg(long, default_value = "kakao")]
        provider: String,
        #[arg(long)]
        code: String,
    },
    /// 清除本地凭证
    Logout,
    /// 注册儿童档案
    RegisterChild {
        name: String,
        /// M / F
        #[arg(long)]
        gender: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birthdate: String,
    },
    /// 列出儿童档案
    Profiles,
    /// 选择当前儿童档案
    SelectProfile { child_id: i64 },
    /// 列出主题
    Themes,
    /// 列出主题下的单词
    Words { theme_id: i64 },
    /// 列出各主题学习进度
    Learning,
    /// 开始主题学习会话
    Learn { theme_id: i64 },
    /// 重新抽取单词卡，缺省使用当前会话
    Reshuffle {
        theme_id: i64,
        #[arg(long)]
        session_id: Option<i64>,
    },
    /// 列出绘本
    Books,
    /// 查询一次童谣状态
    SongStatus { session_id: i64, storybook_id: i64 },
    /// 请求生成童谣
    SongCreate {
        session_id: i64,
        storybook_id: i64,
        #[arg(long)]
        voice_id: i64,
        #[arg(long)]
        mood_id: i64,
    },
    /// 轮询童谣状态直到完成、失败或超时
    SongWatch { session_id: i64, storybook_id: i64 },
    /// 切换童谣收藏状态
    Like { song_id: i64 },
    /// 获取测验题目
    Quiz {
        session_id: i64,
        /// 依次选择正确答案并提交全部题目
        #[arg(long)]
        submit: bool,
    },
    /// 播放背景音乐，Ctrl-C 停止
    Bgm,
}

/// 组合根持有的共享组件
struct App {
    config: AppConfig,
    backend: Arc<dyn BackendApiPort>,
    credentials: Credentials,
    song_states: Arc<dyn SongStateCachePort>,
    events: Arc<EventPublisher>,
}

impl App {
    fn build(config: AppConfig) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(&config.storage.db_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store: Arc<dyn LocalStorePort> =
            SledLocalStore::new(&config.storage.sled_config())?.arc();
        let backend: Arc<dyn BackendApiPort> =
            Arc::new(HttpBackendClient::new(config.api.backend_config())?);

        Ok(Self {
            config,
            backend,
            credentials: Credentials::new(store),
            song_states: Arc::new(InMemorySongStateCache::new()),
            events: EventPublisher::new().arc(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = match &cli.config {
        Some(path) => load_config_from_path(Some(path)),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);
    print_config(&config);

    let app = App::build(config)?;
    run(app, cli.command).await
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!("{},aieng={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(app: App, command: Command) -> anyhow::Result<()> {
    let backend = app.backend.clone();
    let credentials = app.credentials.clone();

    match command {
        Command::Login { provider, code } => {
            let token = LoginHandler::new(backend, credentials)
                .handle(Login { provider, code })
                .await?;
            println!("logged in (new user: {})", token.is_new_user);
        }
        Command::Logout => {
            LogoutHandler::new(credentials).handle(Logout).await?;
            println!("logged out");
        }
        Command::RegisterChild {
            name,
            gender,
            birthdate,
        } => {
            let roster = RegisterChildHandler::new(backend, credentials)
                .handle(RegisterChild {
                    name,
                    gender,
                    birthdate,
                })
                .await?;
            println!("registered ({} profiles)", roster.len());
        }
        Command::Profiles => {
            let roster = ListProfilesHandler::new(backend, credentials)
                .handle(ListProfiles)
                .await?;
            for profile in roster.profiles() {
                let marker = if profile.is_active() { "*" } else { " " };
                println!("{} {:>6}  {}", marker, profile.id(), profile.name());
            }
        }
        Command::SelectProfile { child_id } => {
            let roster = SelectProfileHandler::new(backend, credentials, app.events.clone())
                .handle(SelectProfile { child_id })
                .await?;
            if let Some(active) = roster.active() {
                println!("selected {} ({})", active.name(), active.id());
            }
        }
        Command::Themes => {
            let themes = ListThemesHandler::new(backend, credentials)
                .handle(ListThemes)
                .await?;
            for theme in themes {
                println!(
                    "{:>4}  {} / {}  {}%",
                    theme.theme_id,
                    theme.theme_en,
                    theme.theme_ko,
                    theme.progress_percent()
                );
            }
        }
        Command::Words { theme_id } => {
            let words = ListThemeWordsHandler::new(backend, credentials)
                .handle(ListThemeWords { theme_id })
                .await?;
            for word in words {
                let learned = if word.is_learned { "v" } else { " " };
                println!("[{}] {}  {}", learned, word.word_en, word.word_ko);
            }
        }
        Command::Learning => {
            let themes = ListLearningThemesHandler::new(backend, credentials)
                .handle(ListLearningThemes)
                .await?;
            for theme in themes {
                let state = if theme.is_finished { "done" } else { "" };
                println!(
                    "{:>4}  {}  {}/{}  {}% {}",
                    theme.theme_id,
                    theme.theme_name,
                    theme.learned_words,
                    theme.total_words,
                    theme.progress_rate,
                    state
                );
            }
        }
        Command::Learn { theme_id } => {
            let session = StartLearningSessionHandler::new(backend, credentials)
                .handle(StartLearningSession { theme_id })
                .await?;
            print_session(&session);
        }
        Command::Reshuffle {
            theme_id,
            session_id,
        } => {
            let session = ReshuffleWordsHandler::new(backend, credentials)
                .handle(ReshuffleWords {
                    theme_id,
                    session_id,
                })
                .await?;
            print_session(&session);
        }
        Command::Books => {
            let books = ListStorybooksHandler::new(backend, credentials)
                .handle(ListStorybooks)
                .await?;
            for book in books {
                println!("{:>4}  {}", book.storybook_id, book.title);
            }
        }
        Command::SongStatus {
            session_id,
            storybook_id,
        } => {
            let view = CheckSongStatusHandler::new(
                backend,
                credentials,
                app.song_states.clone(),
                app.events.clone(),
            )
            .handle(CheckSongStatus {
                key: SongKey::new(session_id, storybook_id),
            })
            .await?;
            println!("{} -> {:?}", view.state.status(), view.affordance);
            if let Some(url) = view.state.song_url() {
                println!("url: {}", url);
            }
        }
        Command::SongCreate {
            session_id,
            storybook_id,
            voice_id,
            mood_id,
        } => {
            let state = CreateSongHandler::new(
                backend,
                credentials,
                app.song_states.clone(),
                app.events.clone(),
            )
            .handle(CreateSong {
                key: SongKey::new(session_id, storybook_id),
                voice_id,
                mood_id,
            })
            .await?;
            println!("{}", state.status());
        }
        Command::SongWatch {
            session_id,
            storybook_id,
        } => {
            let auth = credentials.child_auth().await?;
            let poller = Arc::new(SongStatusPoller::new(
                app.config.poll.poller_config(),
                backend,
                app.events.clone(),
            ));

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Received shutdown signal");
                    ctrl_c.cancel();
                }
            });

            let key = SongKey::new(session_id, storybook_id);
            match poller.spawn(auth, key, cancel).await? {
                PollOutcome::Settled(state) => {
                    app.song_states.put(state.clone());
                    println!("{}", state.status());
                    if let Some(url) = state.song_url() {
                        println!("url: {}", url);
                    }
                }
                PollOutcome::TimedOut(last) => match last {
                    Some(status) => println!("timed out (last status {})", status),
                    None => println!("timed out"),
                },
                PollOutcome::Cancelled => println!("cancelled"),
                PollOutcome::Aborted(e) => return Err(e.into()),
            }
        }
        Command::Like { song_id } => {
            let liked = ToggleSongLikeHandler::new(backend, credentials)
                .handle(ToggleSongLike { song_id })
                .await?;
            println!("song {} liked: {}", song_id, liked);
        }
        Command::Quiz { session_id, submit } => {
            let start = StartQuizHandler::new(backend.clone(), credentials.clone())
                .handle(StartQuiz { session_id })
                .await?;
            let mut session = match start {
                QuizStart::AlreadyCompleted { .. } => {
                    println!("quiz for session {} is already completed", session_id);
                    return Ok(());
                }
                QuizStart::Ready(session) => session,
            };

            for (i, question) in session.questions().iter().enumerate() {
                println!(
                    "{}. {}  [{}]",
                    i + 1,
                    question.image_url(),
                    question.options().join(" | ")
                );
            }

            if submit {
                let submitter = SubmitQuizAnswerHandler::new(backend, credentials, app.events);
                loop {
                    let answer = session.current_question().correct_answer().to_string();
                    session.select(&answer)?;
                    match submitter.handle(&mut session).await? {
                        QuizStep::Next { index } => println!("submitted, next question {}", index + 1),
                        QuizStep::Finished => {
                            println!("quiz finished");
                            break;
                        }
                    }
                }
            }
        }
        Command::Bgm => {
            let player = Arc::new(CpalTrackPlayer::new());
            let manager =
                AudioManager::new(player, app.config.audio.bgm_source(), AudioMode::default())
                    .arc();
            let bgm = BgmController::new(manager.clone()).with_events(app.events.clone());

            bgm.mount().await;
            bgm.toggle_bgm().await;
            println!(
                "bgm playing: {} ({:?}), press Ctrl-C to stop",
                bgm.is_bgm_playing(),
                manager.playback_state()
            );
            if bgm.is_bgm_playing() {
                tokio::signal::ctrl_c().await?;
            }
            bgm.unmount().await;
        }
    }

    Ok(())
}

fn print_session(session: &LearningSession) {
    println!(
        "session {}  {} / {}",
        session.session_id, session.theme_en, session.theme_ko
    );
    for word in &session.words {
        let learned = if word.is_learned { "v" } else { " " };
        println!("[{}] {}  {}", learned, word.word_en, word.word_ko);
    }
}
