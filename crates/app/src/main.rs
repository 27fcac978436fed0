use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lesson_core::model::{LessonCatalog, Locale};
use services::{
    Clock, ContentService, Delivery, DialogController, InboundMessage, RetryPolicy,
    builtin_quiz_links, quiz_links_from_json,
};
use storage::loader::LessonLoader;
use storage::repository::Storage;
use telegram::{Poller, TelegramClient};

const DEFAULT_DB_URL: &str = "sqlite://lessons.sqlite3";
const DEFAULT_CONTENT_DIR: &str = "./lessons";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const POLL_RETRY_PAUSE: Duration = Duration::from_secs(3);

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingToken,
    InvalidDbUrl { raw: String },
    InvalidPollTimeout { raw: String },
    InvalidLocale { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingToken => {
                write!(f, "a bot token is required (--token or LESSON_BOT_TOKEN)")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPollTimeout { raw } => {
                write!(f, "invalid --poll-timeout value: {raw}")
            }
            ArgsError::InvalidLocale { raw } => {
                write!(f, "invalid --locale value: {raw} (expected `en` or `uk`)")
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  lesson-bot [--token <token>] [--content-dir <dir>] [--db <sqlite_url>] \
         [--quiz-links <file.json>] [--catalog <file.json>] [--poll-timeout <secs>] \
         [--locale <en|uk>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --content-dir {DEFAULT_CONTENT_DIR}");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --poll-timeout {DEFAULT_POLL_TIMEOUT_SECS}");
    eprintln!("  --locale {}", Locale::default());
    eprintln!();
    eprintln!("Environment (a .env file is read first):");
    eprintln!("  LESSON_BOT_TOKEN, LESSON_CONTENT_DIR, LESSON_DB_URL,");
    eprintln!("  LESSON_QUIZ_LINKS, LESSON_CATALOG, LESSON_LOCALE, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    token: String,
    content_dir: PathBuf,
    db_url: String,
    quiz_links: Option<PathBuf>,
    catalog: Option<PathBuf>,
    poll_timeout: u64,
    locale: Locale,
}

impl Args {
    /// Flags win over the environment, which wins over defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let non_blank = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let mut token = non_blank("LESSON_BOT_TOKEN");
        let mut content_dir = non_blank("LESSON_CONTENT_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR), PathBuf::from);
        let mut db_url = non_blank("LESSON_DB_URL")
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut quiz_links = non_blank("LESSON_QUIZ_LINKS").map(PathBuf::from);
        let mut catalog = non_blank("LESSON_CATALOG").map(PathBuf::from);
        let mut poll_timeout = DEFAULT_POLL_TIMEOUT_SECS;
        let mut locale = non_blank("LESSON_LOCALE")
            .map(|raw| parse_locale(&raw))
            .transpose()?
            .unwrap_or_default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--token" => token = Some(require_value(args, "--token")?),
                "--content-dir" => {
                    content_dir = PathBuf::from(require_value(args, "--content-dir")?);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--quiz-links" => {
                    quiz_links = Some(PathBuf::from(require_value(args, "--quiz-links")?));
                }
                "--catalog" => catalog = Some(PathBuf::from(require_value(args, "--catalog")?)),
                "--poll-timeout" => {
                    let value = require_value(args, "--poll-timeout")?;
                    poll_timeout = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPollTimeout { raw: value.clone() })?;
                }
                "--locale" => locale = parse_locale(&require_value(args, "--locale")?)?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ArgsError::MissingToken)?;
        Ok(Self {
            token,
            content_dir,
            db_url,
            quiz_links,
            catalog,
            poll_timeout,
            locale,
        })
    }
}

fn parse_locale(raw: &str) -> Result<Locale, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidLocale { raw: raw.to_owned() })
}

/// Turns `--db` / `LESSON_DB_URL` into the URL the lesson database is opened with.
///
/// Operators usually pass a bare file name such as `bot.sqlite3`; it is
/// anchored to the working directory so restarts from elsewhere reuse the
/// same lessons and user names. Full `sqlite://` URLs and the in-memory
/// database pass through.
fn normalize_sqlite_url(raw: String) -> String {
    let raw = raw.trim();
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_owned();
    }

    let file = PathBuf::from(raw.strip_prefix("sqlite:").unwrap_or(raw));
    let file = if file.is_absolute() {
        file
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(file)
    };
    format!("sqlite://{}", file.display())
}

/// Makes sure the lesson database file exists before the pool opens it.
///
/// The pool does not create missing files, so a first start would fail
/// without this. An existing file is left as it is: user names saved by
/// earlier runs survive, and lessons are reloaded over it at startup.
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn load_content(args: &Args, storage: &Storage) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match &args.catalog {
        Some(path) => LessonCatalog::from_json(&std::fs::read_to_string(path)?)?,
        None => LessonCatalog::builtin(args.locale),
    };
    let quizzes = match &args.quiz_links {
        Some(path) => quiz_links_from_json(&std::fs::read_to_string(path)?)?,
        None => builtin_quiz_links()?,
    };

    let report = ContentService::new(Arc::clone(&storage.content))
        .bootstrap(&LessonLoader::new(&args.content_dir), &catalog, quizzes)
        .await?;
    tracing::info!(
        lessons = report.total_lessons(),
        quizzes = report.quizzes,
        dir = %args.content_dir.display(),
        "content loaded"
    );
    Ok(())
}

async fn handle_message(controller: &DialogController, message: InboundMessage) {
    let chat_id = message.chat_id;
    match controller.handle(message).await {
        Ok(outcome) => {
            let dropped = outcome.dropped();
            if dropped > 0 {
                tracing::warn!(%chat_id, dropped, "some replies were not delivered");
            }
        }
        Err(err) => tracing::error!(%chat_id, error = %err, "failed to handle message"),
    }
}

/// Polls until Ctrl-C, handling messages one at a time in arrival order.
async fn dispatch(mut poller: Poller, controller: &DialogController) {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let batch = tokio::select! {
            _ = &mut shutdown => break,
            batch = poller.poll() => batch,
        };

        match batch {
            Ok(messages) => {
                for message in messages {
                    handle_message(controller, message).await;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "polling for updates failed");
                tokio::select! {
                    _ = &mut shutdown => break,
                    () = tokio::time::sleep(POLL_RETRY_PAUSE) => {}
                }
            }
        }
    }
    tracing::info!(offset = ?poller.offset(), "shutting down");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite before anything talks to the network.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    load_content(&args, &storage).await?;

    let client = TelegramClient::new(args.token.as_str());
    let me = client.get_me().await?;
    tracing::info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or(&me.first_name),
        "connected to Telegram"
    );

    let retry = RetryPolicy::default();
    tracing::info!(
        locale = %args.locale,
        max_attempts = retry.max_attempts(),
        retry_delay = ?retry.delay(),
        "replies configured"
    );
    let mut controller = DialogController::new(
        Clock::system(),
        Arc::clone(&storage.content),
        Arc::clone(&storage.users),
        Arc::clone(&storage.sessions),
        Delivery::new(Arc::new(client.clone()), retry),
    )
    .with_locale(args.locale);
    if let Some(username) = me.username {
        controller = controller.with_bot_username(username);
    }
    dispatch(Poller::new(client, args.poll_timeout), &controller).await;
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
