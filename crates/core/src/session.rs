use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::model::{ExamConfig, ExamScore, OptionKey, Question, QuestionId, SessionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected exam actions. None of these mutate the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("exam needs {expected} questions, got {actual}")]
    QuestionCountMismatch { expected: usize, actual: usize },

    #[error("exam needs at least one question")]
    NoQuestions,

    #[error("exam has already been submitted")]
    AlreadySubmitted,

    #[error("question index {index} is out of range (exam has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("option {key} does not exist on question {qid}")]
    UnknownOption { qid: QuestionId, key: String },

    #[error("exam is already paused")]
    AlreadyPaused,

    #[error("exam is not paused")]
    NotPaused,
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Verdict recorded when a question is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
}

impl Feedback {
    fn for_question(question: &Question, selected: Option<&OptionKey>) -> Self {
        if question.is_correct(selected) {
            Self {
                correct: true,
                message: "Correct! Nice move!".to_string(),
            }
        } else {
            Self {
                correct: false,
                message: format!("Wrong! The correct answer is **{}**", question.correct()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Paused,
    Submitted,
}

/// Answer/check counts for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub checked: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed attempt at a fixed set of questions.
///
/// Every action takes `now` from the caller's clock and first runs the time-up check,
/// so an expired exam is submitted before the action is considered. After submission
/// the session is read-only.
pub struct ExamSession {
    id: SessionId,
    config: ExamConfig,
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, OptionKey>,
    checked: BTreeMap<usize, Feedback>,
    started_at: DateTime<Utc>,
    // Start instant shifted forward by every completed pause.
    timing_origin: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    timed_out: bool,
    score: Option<ExamScore>,
}

impl ExamSession {
    /// Start the countdown for an already sampled question set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` for an empty set and
    /// `SessionError::QuestionCountMismatch` unless exactly
    /// `config.question_count()` questions are provided.
    pub fn start(
        config: ExamConfig,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        if questions.len() != config.question_count() {
            return Err(SessionError::QuestionCountMismatch {
                expected: config.question_count(),
                actual: questions.len(),
            });
        }

        Ok(Self {
            id: SessionId::generate(),
            config,
            questions,
            current: 0,
            answers: BTreeMap::new(),
            checked: BTreeMap::new(),
            started_at,
            timing_origin: started_at,
            paused_at: None,
            submitted_at: None,
            timed_out: false,
            score: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    /// True when the countdown, not the user, ended the exam.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&OptionKey> {
        self.answers.get(&index)
    }

    #[must_use]
    pub fn feedback(&self, index: usize) -> Option<&Feedback> {
        self.checked.get(&index)
    }

    #[must_use]
    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains_key(&index)
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_submitted() {
            SessionStatus::Submitted
        } else if self.is_paused() {
            SessionStatus::Paused
        } else {
            SessionStatus::Running
        }
    }

    /// Final score, available once submitted.
    #[must_use]
    pub fn score(&self) -> Option<&ExamScore> {
        self.score.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            checked: self.checked.len(),
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.questions.len()
    }

    //
    // ─── TIMING ────────────────────────────────────────────────────────────────
    //

    /// Seconds left on the countdown, floored at zero.
    ///
    /// Paused intervals never count. While paused, or once submitted, the value is
    /// frozen at the pause/submission instant.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u32 {
        let measured_at = self.paused_at.or(self.submitted_at).unwrap_or(now);
        let elapsed = (measured_at - self.timing_origin).num_seconds().max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.config.total_duration_secs().saturating_sub(elapsed)
    }

    /// Submit the exam if the countdown has run out.
    ///
    /// Returns true when this call performed the submission.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_submitted() || self.remaining_seconds(now) > 0 {
            return false;
        }
        self.finalize(now);
        self.timed_out = true;
        true
    }

    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission (including a
    /// time-up submission triggered by this call) and `SessionError::AlreadyPaused`
    /// when paused.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        if self.is_paused() {
            return Err(SessionError::AlreadyPaused);
        }
        self.paused_at = Some(now);
        Ok(())
    }

    /// Resume the countdown, excluding the paused interval from elapsed time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotPaused` when running and
    /// `SessionError::AlreadySubmitted` after submission.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        let Some(paused_at) = self.paused_at.take() else {
            return Err(SessionError::NotPaused);
        };
        let paused_for = now - paused_at;
        if paused_for > chrono::Duration::zero() {
            self.timing_origin += paused_for;
        }
        Ok(())
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record the selected option for a question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for out-of-range indices, unknown keys, or a submitted exam.
    pub fn select_option(
        &mut self,
        index: usize,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        let question = self.question_at(index)?;
        let option = question
            .option(key)
            .ok_or_else(|| SessionError::UnknownOption {
                qid: question.id().clone(),
                key: key.to_string(),
            })?;
        let selected = option.key().clone();
        self.answers.insert(index, selected);
        Ok(())
    }

    /// Compute and store feedback for the current selection of a question.
    ///
    /// Re-checking recomputes from the latest selection. Checking never affects the score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` for out-of-range indices or a submitted exam.
    pub fn check_answer(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<&Feedback, SessionError> {
        self.ensure_open(now)?;
        let question = self.question_at(index)?;
        let feedback = Feedback::for_question(question, self.answers.get(&index));
        Ok(self.checked.entry(index).insert_entry(feedback).into_mut())
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Score and freeze the exam.
    ///
    /// Calling again returns the stored score without re-scoring. An exam whose
    /// countdown already ran out is submitted as timed out.
    pub fn submit(&mut self, now: DateTime<Utc>) -> ExamScore {
        self.tick(now);
        if let Some(score) = &self.score {
            return score.clone();
        }
        self.finalize(now)
    }

    fn finalize(&mut self, now: DateTime<Utc>) -> ExamScore {
        let score = self.tally();
        self.submitted_at = Some(now);
        self.score = Some(score.clone());
        score
    }

    fn tally(&self) -> ExamScore {
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|(index, question)| question.is_correct(self.answers.get(index)))
            .count();
        let marks = self.config.marks_per_question();
        ExamScore {
            correct,
            total: self.questions.len(),
            score: u32::try_from(correct).unwrap_or(u32::MAX).saturating_mul(marks),
            max_marks: self.config.max_marks(),
            pass_marks: self.config.pass_marks(),
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `SessionError` for out-of-range indices or a submitted exam.
    pub fn go_to(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        self.question_at(index)?;
        self.current = index;
        Ok(())
    }

    /// Step back one question; a no-op on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn previous(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Step forward one question; a no-op on the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    pub fn next(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        if self.has_next() {
            self.current += 1;
        }
        Ok(())
    }

    fn ensure_open(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.tick(now);
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(())
    }

    fn question_at(&self, index: usize) -> Result<&Question, SessionError> {
        self.questions
            .get(index)
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("checked_len", &self.checked.len())
            .field("started_at", &self.started_at)
            .field("paused_at", &self.paused_at)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
