use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::Clock;
use quiz_core::model::QuizSettings;
use services::{AccountService, OpenAiQuestionService, QuizFlowService, ScoreboardService};
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    accounts: Arc<AccountService>,
    quiz_flow: Arc<QuizFlowService>,
    scoreboard: Arc<ScoreboardService>,
    auth_enabled: bool,
    questions_enabled: bool,
}

impl UiApp for DesktopApp {
    fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    fn scoreboard(&self) -> Arc<ScoreboardService> {
        Arc::clone(&self.scoreboard)
    }

    fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    fn questions_enabled(&self) -> bool {
        self.questions_enabled
    }
}

struct Args {
    db_url: Option<String>,
    questions_per_quiz: u32,
    points_per_correct: u32,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--questions <n>] [--points <n>]");
    eprintln!();
    eprintln!("Without --db (or QUIZ_DB_URL) the app runs in demo-only mode:");
    eprintln!("no accounts, no leaderboard, scores discarded on exit.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS_PER_QUIZ, QUIZ_POINTS_PER_CORRECT");
    eprintln!("  QUIZ_AI_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
}

fn parse_number(flag: &'static str, raw: &str) -> Result<u32, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidNumber {
        flag,
        raw: raw.to_string(),
    })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL").ok().map(normalize_sqlite_url);
        let mut questions_per_quiz = std::env::var("QUIZ_QUESTIONS_PER_QUIZ")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or_else(|| QuizSettings::default().questions_per_quiz());
        let mut points_per_correct = std::env::var("QUIZ_POINTS_PER_CORRECT")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or_else(|| QuizSettings::default().points_per_correct());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--questions" => {
                    let value = require_value(args, "--questions")?;
                    questions_per_quiz = parse_number("--questions", &value)?;
                }
                "--points" => {
                    let value = require_value(args, "--points")?;
                    points_per_correct = parse_number("--points", &value)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions_per_quiz,
            points_per_correct,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,app=debug".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = QuizSettings::new(parsed.questions_per_quiz, parsed.points_per_correct)?;

    // Open + migrate SQLite at startup; without a database the whole flow
    // degrades to demo-only on an in-memory store.
    let (storage, auth_enabled) = match &parsed.db_url {
        Some(db_url) => {
            prepare_sqlite_file(db_url)?;
            (Storage::sqlite(db_url).await?, true)
        }
        None => {
            tracing::warn!("no database configured; running in demo-only mode");
            (Storage::in_memory(), false)
        }
    };

    let question_service = OpenAiQuestionService::from_env();
    let questions_enabled = question_service.enabled();
    if !questions_enabled {
        tracing::warn!("QUIZ_AI_API_KEY is not set; quizzes cannot start");
    }

    let clock = Clock::default_clock();
    let quiz_flow = Arc::new(QuizFlowService::new(
        clock,
        settings,
        Arc::new(question_service),
        Arc::clone(&storage.scores),
    ));
    let accounts = Arc::new(AccountService::new(Arc::clone(&storage.accounts)));
    let scoreboard = Arc::new(ScoreboardService::new(Arc::clone(&storage.scores)));

    let app = DesktopApp {
        accounts,
        quiz_flow,
        scoreboard,
        auth_enabled,
        questions_enabled,
    };

    let desktop_app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&desktop_app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("AI Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
