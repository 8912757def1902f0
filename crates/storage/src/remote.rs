use std::time::Duration;

use async_trait::async_trait;
use exam_core::model::Question;
use reqwest::{Client, Url};

use crate::json::parse_bank;
use crate::repository::{QuestionBankLoader, StorageError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Bank published as a JSON object behind an HTTP(S) URL, e.g. a storage bucket.
#[derive(Clone)]
pub struct HttpQuestionBank {
    client: Client,
    url: Url,
}

impl HttpQuestionBank {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self::with_client(Client::new(), url)
    }

    #[must_use]
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl QuestionBankLoader for HttpQuestionBank {
    async fn load(&self) -> Result<Vec<Question>, StorageError> {
        let response = self
            .client
            .get(self.url.clone())
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound);
        }
        if !status.is_success() {
            return Err(StorageError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let questions = parse_bank(&body)?;
        tracing::debug!(url = %self.url, count = questions.len(), "fetched remote bank");
        Ok(questions)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}
