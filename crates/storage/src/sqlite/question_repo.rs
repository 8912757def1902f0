use async_trait::async_trait;
use exam_core::model::Question;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{assemble_records, conn, position_to_i64, ser};
use crate::repository::{QuestionBankLoader, StorageError, records_into_bank};

impl SqliteRepository {
    /// Insert or replace questions, keeping the slice order as bank order.
    ///
    /// Runs in one transaction, so a failure leaves the bank unchanged.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if any statement fails.
    pub async fn upsert_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let next_position: i64 =
            sqlx::query("SELECT COALESCE(MAX(position) + 1, 0) AS next FROM questions")
                .fetch_one(&mut *tx)
                .await
                .map_err(conn)?
                .try_get("next")
                .map_err(ser)?;

        for (offset, question) in questions.iter().enumerate() {
            let qid = question.id().as_str();
            let position = next_position + position_to_i64(offset)?;

            sqlx::query("DELETE FROM question_answers WHERE qid = ?1")
                .bind(qid)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            sqlx::query("DELETE FROM question_options WHERE qid = ?1")
                .bind(qid)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;

            sqlx::query(
                r"
                INSERT INTO questions (qid, position, question_text)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(qid) DO UPDATE SET
                    question_text = excluded.question_text
                ",
            )
            .bind(qid)
            .bind(position)
            .bind(question.prompt())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            for (option_position, option) in question.options().iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO question_options (qid, position, option_key, option_text)
                    VALUES (?1, ?2, ?3, ?4)
                    ",
                )
                .bind(qid)
                .bind(position_to_i64(option_position)?)
                .bind(option.key().as_str())
                .bind(option.text())
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
            }

            for key in question.correct().keys() {
                sqlx::query("INSERT INTO question_answers (qid, option_key) VALUES (?1, ?2)")
                    .bind(qid)
                    .bind(key.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    /// Number of questions stored in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the query fails.
    pub async fn question_count(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS total FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?
            .try_get("total")
            .map_err(ser)?;
        u64::try_from(count).map_err(ser)
    }
}

#[async_trait]
impl QuestionBankLoader for SqliteRepository {
    async fn load(&self) -> Result<Vec<Question>, StorageError> {
        let question_rows =
            sqlx::query("SELECT qid, question_text FROM questions ORDER BY position, qid")
                .fetch_all(&self.pool)
                .await
                .map_err(conn)?;
        let option_rows = sqlx::query(
            "SELECT qid, option_key, option_text FROM question_options ORDER BY qid, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let answer_rows =
            sqlx::query("SELECT qid, option_key FROM question_answers ORDER BY qid, option_key")
                .fetch_all(&self.pool)
                .await
                .map_err(conn)?;

        let records = assemble_records(&question_rows, &option_rows, &answer_rows)?;
        let questions = records_into_bank(records)?;
        tracing::debug!(count = questions.len(), "loaded bank from sqlite");
        Ok(questions)
    }

    fn describe(&self) -> String {
        "sqlite bank".to_string()
    }
}
