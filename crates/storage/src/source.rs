use std::sync::Arc;

use exam_core::model::BankSource;

use crate::json::JsonFileBank;
use crate::remote::HttpQuestionBank;
use crate::repository::{QuestionBankLoader, Storage, StorageError};

impl Storage {
    /// Build the storage for a parsed bank source.
    ///
    /// File and HTTP sources are lazy: nothing is read until the bank is loaded.
    /// `SQLite` sources connect and migrate up front.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the `SQLite` database cannot be opened.
    pub async fn from_source(source: &BankSource) -> Result<Self, StorageError> {
        let bank: Arc<dyn QuestionBankLoader> = match source {
            BankSource::File(path) => Arc::new(JsonFileBank::new(path.clone())),
            BankSource::Http(url) => Arc::new(HttpQuestionBank::new(url.clone())),
            BankSource::Sqlite(url) => {
                return Self::sqlite(url)
                    .await
                    .map_err(|e| StorageError::Connection(e.to_string()));
            }
        };
        tracing::info!(%source, "configured question bank");
        Ok(Self { bank })
    }
}
