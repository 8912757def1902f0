use async_trait::async_trait;
use exam_core::model::{AnswerKey, AnswerOption, OptionKey, Question, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question bank adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("bank request failed with status {0}")]
    HttpStatus(u16),

    #[error("invalid question {qid}: {source}")]
    InvalidQuestion {
        qid: String,
        #[source]
        source: QuestionError,
    },

    #[error("duplicate question id in bank: {0}")]
    DuplicateQuestion(String),

    #[error("question bank is empty")]
    EmptyBank,
}

//
// ─── BANK RECORD FORMAT ────────────────────────────────────────────────────────
//

/// Persisted shape of one bank question.
///
/// `options` keeps the key order of the source document. `qid` may be written
/// as a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "qid_format::deserialize")]
    pub qid: String,
    pub question_text: String,
    #[serde(with = "ordered_options")]
    pub options: Vec<(String, String)>,
    pub correct_answer: CorrectAnswerRecord,
}

/// `correct_answer` is either one key or a list of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswerRecord {
    One(String),
    Many(Vec<String>),
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let options = question
            .options()
            .iter()
            .map(|option| (option.key().to_string(), option.text().to_string()))
            .collect();
        let correct_answer = match question.correct() {
            AnswerKey::Single(key) => CorrectAnswerRecord::One(key.to_string()),
            AnswerKey::Multiple(keys) => {
                CorrectAnswerRecord::Many(keys.iter().map(ToString::to_string).collect())
            }
        };
        Self {
            qid: question.id().to_string(),
            question_text: question.prompt().to_string(),
            options,
            correct_answer,
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` if any field fails validation.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let qid = self.qid;
        let invalid = |source: QuestionError| StorageError::InvalidQuestion {
            qid: qid.clone(),
            source,
        };

        let id = QuestionId::new(qid.clone())
            .map_err(|_| StorageError::Serialization("question id cannot be empty".into()))?;
        let options = self
            .options
            .into_iter()
            .map(|(key, text)| OptionKey::new(key).map(|key| AnswerOption::new(key, text)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let keys = match self.correct_answer {
            CorrectAnswerRecord::One(key) => vec![key],
            CorrectAnswerRecord::Many(keys) => keys,
        };
        let correct = keys
            .into_iter()
            .map(OptionKey::new)
            .collect::<Result<Vec<_>, _>>()
            .and_then(AnswerKey::from_keys)
            .map_err(invalid)?;

        Question::new(id, self.question_text, options, correct).map_err(invalid)
    }
}

/// Validate a whole bank: every record must convert, ids must be unique, and the
/// bank must not be empty. No partial bank is returned.
///
/// # Errors
///
/// Returns the first `StorageError` encountered.
pub fn records_into_bank(records: Vec<QuestionRecord>) -> Result<Vec<Question>, StorageError> {
    if records.is_empty() {
        return Err(StorageError::EmptyBank);
    }
    let mut seen = HashSet::with_capacity(records.len());
    let mut questions = Vec::with_capacity(records.len());
    for record in records {
        let question = record.into_question()?;
        if !seen.insert(question.id().clone()) {
            return Err(StorageError::DuplicateQuestion(question.id().to_string()));
        }
        questions.push(question);
    }
    Ok(questions)
}

mod qid_format {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawQid {
        Text(String),
        Number(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawQid::deserialize(deserializer)? {
            RawQid::Text(text) => text,
            RawQid::Number(number) => number.to_string(),
        })
    }
}

mod ordered_options {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(options: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(options.len()))?;
        for (key, text) in options {
            map.serialize_entry(key, text)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping option keys to option text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(4));
                while let Some((key, text)) = access.next_entry::<String, String>()? {
                    entries.push((key, text));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

//
// ─── LOADER CONTRACT ───────────────────────────────────────────────────────────
//

/// Source of the candidate question pool.
#[async_trait]
pub trait QuestionBankLoader: Send + Sync {
    /// Fetch the full bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the source is unreachable or any record is
    /// malformed. Implementations never return a partial bank.
    async fn load(&self) -> Result<Vec<Question>, StorageError>;

    /// Human-readable description of where the bank comes from.
    fn describe(&self) -> String;
}

/// Simple in-memory bank for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
        }
    }

    /// Replace the stored bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn replace(&self, questions: Vec<Question>) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = questions;
        Ok(())
    }
}

#[async_trait]
impl QuestionBankLoader for InMemoryQuestionBank {
    async fn load(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.is_empty() {
            return Err(StorageError::EmptyBank);
        }
        Ok(guard.clone())
    }

    fn describe(&self) -> String {
        "in-memory bank".to_string()
    }
}

/// Holds the configured bank loader behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn QuestionBankLoader>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        let bank: Arc<dyn QuestionBankLoader> = Arc::new(InMemoryQuestionBank::new(questions));
        Self { bank }
    }

    #[must_use]
    pub fn with_loader(bank: Arc<dyn QuestionBankLoader>) -> Self {
        Self { bank }
    }
}
