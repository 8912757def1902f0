use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankSourceError {
    #[error("bank source cannot be empty")]
    Empty,

    #[error("invalid bank url {raw}: {reason}")]
    InvalidUrl { raw: String, reason: String },
}

/// Where the question bank lives.
///
/// Parsed from a single string: `http(s)://` URLs fetch a JSON object, `sqlite:`
/// URLs read the bank tables, anything else is a path to a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    File(PathBuf),
    Http(Url),
    Sqlite(String),
}

impl FromStr for BankSource {
    type Err = BankSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(BankSourceError::Empty);
        }
        if raw.starts_with("sqlite:") {
            return Ok(Self::Sqlite(raw.to_string()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|e| BankSourceError::InvalidUrl {
                raw: raw.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Http(url));
        }
        Ok(Self::File(PathBuf::from(raw)))
    }
}

impl fmt::Display for BankSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => write!(f, "{url}"),
            Self::Sqlite(url) => f.write_str(url),
        }
    }
}
