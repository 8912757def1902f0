use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use exam_core::ExamSession;
use exam_core::model::QuestionId;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::AdvisoryError;

const DEFAULT_USER_ID: &str = "student1";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Debug)]
pub struct AdvisoryConfig {
    pub endpoint: String,
    pub user_id: String,
    pub timeout: Duration,
}

impl AdvisoryConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_id: DEFAULT_USER_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var("EXAM_ADVISORY_URL").ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }
        let user_id = env::var("EXAM_USER_ID").unwrap_or_else(|_| DEFAULT_USER_ID.into());
        let timeout = env::var("EXAM_ADVISORY_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            endpoint: endpoint.trim().to_string(),
            user_id,
            timeout: Duration::from_secs(timeout),
        })
    }
}

/// Answer returned by the advisory endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryAnswer {
    pub answer: String,
    pub source: String,
}

/// Remote Q&A collaborator.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    /// # Errors
    ///
    /// Returns `AdvisoryError` for transport failures, non-2xx responses or an
    /// empty answer.
    async fn ask(
        &self,
        qid: &QuestionId,
        user_id: &str,
        query: &str,
    ) -> Result<AdvisoryAnswer, AdvisoryError>;
}

/// JSON-over-HTTP advisory client.
#[derive(Clone)]
pub struct HttpAdvisoryClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAdvisoryClient {
    #[must_use]
    pub fn new(config: &AdvisoryConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl AdvisoryClient for HttpAdvisoryClient {
    async fn ask(
        &self,
        qid: &QuestionId,
        user_id: &str,
        query: &str,
    ) -> Result<AdvisoryAnswer, AdvisoryError> {
        let payload = AskRequest {
            qid: qid.as_str(),
            question: query,
            user_id,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AdvisoryError::HttpStatus(response.status()));
        }

        let body: AskResponse = response.json().await?;
        let answer = body
            .answer
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .ok_or(AdvisoryError::EmptyResponse)?;

        Ok(AdvisoryAnswer {
            answer,
            source: body.source.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    qid: &'a str,
    question: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: Option<String>,
    source: Option<String>,
}

/// Outcome shown next to the question: an answer with its source, or no
/// answer and an error description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryReply {
    pub answer: Option<String>,
    pub source: String,
}

impl AdvisoryReply {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.answer.is_none()
    }
}

/// Session-facing wrapper that never fails: every error becomes an inline reply.
#[derive(Clone)]
pub struct AdvisoryService {
    client: Option<Arc<dyn AdvisoryClient>>,
    user_id: String,
}

impl AdvisoryService {
    #[must_use]
    pub fn from_env() -> Self {
        match AdvisoryConfig::from_env() {
            Some(config) => Self::new(Arc::new(HttpAdvisoryClient::new(&config)), config.user_id),
            None => Self::disabled(),
        }
    }

    #[must_use]
    pub fn new(client: Arc<dyn AdvisoryClient>, user_id: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            client: None,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Ask about a question. Does not touch any exam state.
    pub async fn ask(&self, qid: QuestionId, query: String) -> AdvisoryReply {
        match self.try_ask(&qid, &query).await {
            Ok(answer) => AdvisoryReply {
                answer: Some(answer.answer),
                source: answer.source,
            },
            Err(err) => {
                tracing::warn!(%qid, error = %err, "advisory query failed");
                AdvisoryReply {
                    answer: None,
                    source: err.to_string(),
                }
            }
        }
    }

    /// Ask about the question currently shown in `session`.
    pub async fn ask_current(&self, session: &ExamSession, query: &str) -> AdvisoryReply {
        let qid = session.current_question().id().clone();
        self.ask(qid, query.to_string()).await
    }

    async fn try_ask(&self, qid: &QuestionId, query: &str) -> Result<AdvisoryAnswer, AdvisoryError> {
        let client = self.client.as_ref().ok_or(AdvisoryError::Disabled)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(AdvisoryError::EmptyQuery);
        }
        client.ask(qid, &self.user_id, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        calls: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl AdvisoryClient for RecordingClient {
        async fn ask(
            &self,
            qid: &QuestionId,
            user_id: &str,
            query: &str,
        ) -> Result<AdvisoryAnswer, AdvisoryError> {
            self.calls.lock().unwrap().push((
                qid.to_string(),
                user_id.to_string(),
                query.to_string(),
            ));
            if self.fail {
                return Err(AdvisoryError::EmptyResponse);
            }
            Ok(AdvisoryAnswer {
                answer: format!("About {qid}"),
                source: "docs".into(),
            })
        }
    }

    #[tokio::test]
    async fn forwards_qid_user_and_query() {
        let client = Arc::new(RecordingClient::default());
        let service = AdvisoryService::new(client.clone(), "student9");

        let reply = service
            .ask(QuestionId::new("q3").unwrap(), "  Why not A? ".into())
            .await;

        assert_eq!(reply.answer.as_deref(), Some("About q3"));
        assert_eq!(reply.source, "docs");
        let calls = client.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            [("q3".to_string(), "student9".to_string(), "Why not A?".to_string())]
        );
    }

    #[tokio::test]
    async fn failures_become_inline_replies() {
        let client = Arc::new(RecordingClient {
            fail: true,
            ..RecordingClient::default()
        });
        let service = AdvisoryService::new(client, "student1");
        let reply = service.ask(QuestionId::new("q1").unwrap(), "help".into()).await;
        assert!(reply.is_error());
        assert_eq!(reply.source, "advisory service returned an empty answer");
    }

    #[tokio::test]
    async fn disabled_and_blank_queries_never_call_out() {
        let reply = AdvisoryService::disabled()
            .ask(QuestionId::new("q1").unwrap(), "help".into())
            .await;
        assert_eq!(reply.source, "advisory service is not configured");

        let client = Arc::new(RecordingClient::default());
        let service = AdvisoryService::new(client.clone(), "student1");
        let reply = service.ask(QuestionId::new("q1").unwrap(), "   ".into()).await;
        assert!(reply.is_error());
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn status_errors_read_like_error_codes() {
        let err = AdvisoryError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Error code 503");
    }
}
