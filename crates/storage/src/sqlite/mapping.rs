use std::collections::HashMap;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{CorrectAnswerRecord, QuestionRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn position_to_i64(position: usize) -> Result<i64, StorageError> {
    i64::try_from(position).map_err(|_| StorageError::Serialization("position overflow".into()))
}

/// Join question, option and answer rows into bank records.
///
/// Question rows are expected in bank order; option rows in display order.
pub(crate) fn assemble_records(
    question_rows: &[SqliteRow],
    option_rows: &[SqliteRow],
    answer_rows: &[SqliteRow],
) -> Result<Vec<QuestionRecord>, StorageError> {
    let mut options: HashMap<String, Vec<(String, String)>> = HashMap::new();
    for row in option_rows {
        let qid: String = row.try_get("qid").map_err(ser)?;
        let key: String = row.try_get("option_key").map_err(ser)?;
        let text: String = row.try_get("option_text").map_err(ser)?;
        options.entry(qid).or_default().push((key, text));
    }

    let mut answers: HashMap<String, Vec<String>> = HashMap::new();
    for row in answer_rows {
        let qid: String = row.try_get("qid").map_err(ser)?;
        let key: String = row.try_get("option_key").map_err(ser)?;
        answers.entry(qid).or_default().push(key);
    }

    question_rows
        .iter()
        .map(|row| {
            let qid: String = row.try_get("qid").map_err(ser)?;
            let question_text: String = row.try_get("question_text").map_err(ser)?;
            let mut keys = answers.remove(&qid).unwrap_or_default();
            let correct_answer = if keys.len() == 1 {
                CorrectAnswerRecord::One(keys.remove(0))
            } else {
                CorrectAnswerRecord::Many(keys)
            };
            Ok(QuestionRecord {
                options: options.remove(&qid).unwrap_or_default(),
                qid,
                question_text,
                correct_answer,
            })
        })
        .collect()
}
