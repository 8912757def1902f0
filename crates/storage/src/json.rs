use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use exam_core::model::Question;

use crate::repository::{QuestionBankLoader, QuestionRecord, StorageError, records_into_bank};

/// Parse a JSON array of bank records.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and the validation
/// errors of [`records_into_bank`] otherwise.
pub fn parse_bank(bytes: &[u8]) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records_into_bank(records)
}

/// Serialize questions back into the bank record format.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_bank(questions: &[Question]) -> Result<Vec<u8>, StorageError> {
    let records: Vec<QuestionRecord> = questions.iter().map(QuestionRecord::from_question).collect();
    serde_json::to_vec_pretty(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Bank stored as a JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileBank {
    path: PathBuf,
}

impl JsonFileBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionBankLoader for JsonFileBank {
    async fn load(&self) -> Result<Vec<Question>, StorageError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound,
            _ => StorageError::Connection(e.to_string()),
        })?;
        let questions = parse_bank(&bytes)?;
        tracing::debug!(path = %self.path.display(), count = questions.len(), "loaded bank file");
        Ok(questions)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
