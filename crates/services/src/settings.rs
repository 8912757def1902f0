use std::env;
use std::str::FromStr;

use exam_core::model::{BankSource, ExamConfig};

use crate::error::SettingsError;

const DEFAULT_BANK: &str = "questions.json";

/// Launch-time exam settings, read from `EXAM_*` environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct ExamSettings {
    pub bank: BankSource,
    pub config: ExamConfig,
    pub seed: Option<u64>,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            bank: BankSource::File(DEFAULT_BANK.into()),
            config: ExamConfig::default(),
            seed: None,
        }
    }
}

impl ExamSettings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a variable is present but unparsable, or the
    /// resulting exam config is invalid.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup, so callers can layer flags
    /// over the environment.
    ///
    /// # Errors
    ///
    /// See [`ExamSettings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ExamConfig::default();

        let bank = match lookup("EXAM_BANK") {
            Some(raw) => BankSource::from_str(&raw)?,
            None => BankSource::File(DEFAULT_BANK.into()),
        };
        let total_secs = parse_var(&lookup, "EXAM_TOTAL_SECONDS")?
            .unwrap_or(defaults.total_duration_secs());
        let question_count =
            parse_var(&lookup, "EXAM_QUESTION_COUNT")?.unwrap_or(defaults.question_count());
        let marks = parse_var(&lookup, "EXAM_MARKS_PER_QUESTION")?
            .unwrap_or(defaults.marks_per_question());
        let pass_ratio = parse_var(&lookup, "EXAM_PASS_RATIO")?.unwrap_or(defaults.pass_ratio());
        let seed = parse_var(&lookup, "EXAM_SEED")?;

        let config = ExamConfig::new(total_secs, question_count, marks, pass_ratio)?;
        Ok(Self { bank, config, seed })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| SettingsError::InvalidValue { name, raw })
}
