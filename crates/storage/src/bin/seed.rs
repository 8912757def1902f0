use std::fmt;
use std::path::PathBuf;

use exam_core::model::{AnswerKey, AnswerOption, OptionKey, Question, QuestionId};
use storage::json::JsonFileBank;
use storage::repository::QuestionBankLoader;
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    from: Option<PathBuf>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("EXAM_DB_URL").unwrap_or_else(|_| "sqlite:bank.sqlite3?mode=rwc".into());
        let mut from = std::env::var("EXAM_SEED_FROM").ok().map(PathBuf::from);

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--from" => {
                    let value = require_value(&mut args, "--from")?;
                    from = Some(PathBuf::from(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url, from })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:bank.sqlite3?mode=rwc)");
    eprintln!("  --from <bank.json>        Import this JSON bank instead of the sample questions");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  EXAM_DB_URL, EXAM_SEED_FROM");
}

fn sample_bank() -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let samples = [
        ("Which service stores objects in buckets?", ["S3", "EBS", "EFS", "RDS"], "A"),
        ("Which service runs virtual machines?", ["Lambda", "EC2", "SQS", "SNS"], "B"),
        ("Which service is a managed message queue?", ["SNS", "Kinesis", "SQS", "SES"], "C"),
        ("Which service provides serverless functions?", ["ECS", "Batch", "EKS", "Lambda"], "D"),
        ("Which database is key-value and serverless?", ["DynamoDB", "Aurora", "Redshift", "Neptune"], "A"),
        ("Which service provides a CDN?", ["Route 53", "CloudFront", "Direct Connect", "VPC"], "B"),
        ("Which service manages DNS?", ["CloudFront", "ELB", "Route 53", "ACM"], "C"),
        ("Which service audits API calls?", ["Config", "Inspector", "GuardDuty", "CloudTrail"], "D"),
        ("Which service stores secrets with rotation?", ["Secrets Manager", "KMS", "IAM", "Shield"], "A"),
        ("Which service is a data warehouse?", ["Athena", "Redshift", "Glue", "EMR"], "B"),
        ("Which service sends email?", ["SNS", "Pinpoint", "SES", "Connect"], "C"),
        ("Which service balances HTTP traffic?", ["NAT Gateway", "Transit Gateway", "VPN", "ALB"], "D"),
    ];
    let keys = ["A", "B", "C", "D"];

    let mut questions = Vec::with_capacity(samples.len());
    for (i, (prompt, texts, correct)) in samples.iter().enumerate() {
        let options = keys
            .iter()
            .zip(texts.iter())
            .map(|(key, text)| Ok(AnswerOption::new(OptionKey::new(*key)?, *text)))
            .collect::<Result<Vec<_>, exam_core::model::QuestionError>>()?;
        let question = Question::new(
            QuestionId::new(format!("sample-{:02}", i + 1))?,
            *prompt,
            options,
            AnswerKey::Single(OptionKey::new(*correct)?),
        )?;
        questions.push(question);
    }
    Ok(questions)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let questions = match &args.from {
        Some(path) => JsonFileBank::new(path.clone()).load().await?,
        None => sample_bank()?,
    };

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    repo.upsert_questions(&questions).await?;
    let total = repo.question_count().await?;

    println!(
        "Seeded {} questions into {} ({} in bank)",
        questions.len(),
        args.db_url,
        total
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
