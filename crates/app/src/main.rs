use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::model::{BankSource, ExamConfig};
use services::{AdvisoryService, AppServices, Clock, ExamLoopService, ExamSettings};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidBank { raw: String, reason: String },
    InvalidConfig(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidBank { raw, reason } => write!(f, "invalid --bank value {raw}: {reason}"),
            ArgsError::InvalidConfig(reason) => write!(f, "invalid exam settings: {reason}"),
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

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

struct DesktopApp {
    config: ExamConfig,
    exam_loop: Arc<ExamLoopService>,
    advisory: Arc<AdvisoryService>,
}

impl UiApp for DesktopApp {
    fn exam_config(&self) -> ExamConfig {
        self.config.clone()
    }

    fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    fn advisory(&self) -> Arc<AdvisoryService> {
        Arc::clone(&self.advisory)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <source>] [--questions <n>] [--duration <secs>] [--seed <n>]");
    eprintln!();
    eprintln!("Bank sources:");
    eprintln!("  path/to/questions.json");
    eprintln!("  https://host/bucket/questions.json");
    eprintln!("  sqlite:bank.sqlite3");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank questions.json --questions 10 --duration 1200");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_BANK, EXAM_QUESTION_COUNT, EXAM_TOTAL_SECONDS, EXAM_MARKS_PER_QUESTION,");
    eprintln!("  EXAM_PASS_RATIO, EXAM_SEED, EXAM_ADVISORY_URL, EXAM_USER_ID,");
    eprintln!("  EXAM_ADVISORY_TIMEOUT_SECS, RUST_LOG");
}

/// Flags layered over the environment settings.
fn apply_args(
    mut settings: ExamSettings,
    args: &mut impl Iterator<Item = String>,
) -> Result<ExamSettings, ArgsError> {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bank" => {
                let value = require_value(args, "--bank")?;
                settings.bank = value.parse::<BankSource>().map_err(|e| ArgsError::InvalidBank {
                    raw: value.clone(),
                    reason: e.to_string(),
                })?;
            }
            "--questions" => {
                let count = parse_number(require_value(args, "--questions")?, "--questions")?;
                settings.config = settings
                    .config
                    .with_question_count(count)
                    .map_err(|e| ArgsError::InvalidConfig(e.to_string()))?;
            }
            "--duration" => {
                let secs = parse_number(require_value(args, "--duration")?, "--duration")?;
                settings.config = settings
                    .config
                    .with_total_duration_secs(secs)
                    .map_err(|e| ArgsError::InvalidConfig(e.to_string()))?;
            }
            "--seed" => {
                settings.seed = Some(parse_number(require_value(args, "--seed")?, "--seed")?);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(settings)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = ExamSettings::from_env()?;
    let mut args = std::env::args().skip(1);
    let settings = apply_args(settings, &mut args).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Bank adapters (SQLite pool, HTTP client) live on this runtime; it must outlive the UI.
    let runtime = tokio::runtime::Runtime::new()?;
    let services =
        runtime.block_on(AppServices::from_settings(&settings, Clock::default_clock()))?;
    tracing::info!(
        bank = %settings.bank,
        questions = settings.config.question_count(),
        total_secs = settings.config.total_duration_secs(),
        advisory = services.advisory().enabled(),
        "launching exam app"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        config: services.config().clone(),
        exam_loop: services.exam_loop(),
        advisory: services.advisory(),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Practice Test Assistant")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);

    drop(runtime);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
