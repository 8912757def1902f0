use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ExamConfigError {
    #[error("total duration must be > 0 seconds")]
    InvalidDuration,

    #[error("question count must be > 0")]
    InvalidQuestionCount,

    #[error("marks per question must be > 0")]
    InvalidMarksPerQuestion,

    #[error("pass ratio must be within [0, 1], got {0}")]
    InvalidPassRatio(f64),
}

/// Timing and scoring rules for an exam attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamConfig {
    total_duration_secs: u32,
    question_count: usize,
    marks_per_question: u32,
    pass_ratio: f64,
}

impl ExamConfig {
    pub const DEFAULT_TOTAL_DURATION_SECS: u32 = 1200;
    pub const DEFAULT_QUESTION_COUNT: usize = 10;
    pub const DEFAULT_MARKS_PER_QUESTION: u32 = 10;
    pub const DEFAULT_PASS_RATIO: f64 = 0.70;

    /// # Errors
    ///
    /// Returns `ExamConfigError` when any value is zero or the pass ratio is outside `[0, 1]`.
    pub fn new(
        total_duration_secs: u32,
        question_count: usize,
        marks_per_question: u32,
        pass_ratio: f64,
    ) -> Result<Self, ExamConfigError> {
        if total_duration_secs == 0 {
            return Err(ExamConfigError::InvalidDuration);
        }
        if question_count == 0 {
            return Err(ExamConfigError::InvalidQuestionCount);
        }
        if marks_per_question == 0 {
            return Err(ExamConfigError::InvalidMarksPerQuestion);
        }
        if !(0.0..=1.0).contains(&pass_ratio) {
            return Err(ExamConfigError::InvalidPassRatio(pass_ratio));
        }

        Ok(Self {
            total_duration_secs,
            question_count,
            marks_per_question,
            pass_ratio,
        })
    }

    #[must_use]
    pub fn total_duration_secs(&self) -> u32 {
        self.total_duration_secs
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn marks_per_question(&self) -> u32 {
        self.marks_per_question
    }

    #[must_use]
    pub fn pass_ratio(&self) -> f64 {
        self.pass_ratio
    }

    /// `question_count * marks_per_question`.
    #[must_use]
    pub fn max_marks(&self) -> u32 {
        u32::try_from(self.question_count)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.marks_per_question)
    }

    /// `round(max_marks * pass_ratio)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pass_marks(&self) -> u32 {
        (f64::from(self.max_marks()) * self.pass_ratio).round() as u32
    }

    /// Pass ratio as a whole percentage, for display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pass_percent(&self) -> u32 {
        (self.pass_ratio * 100.0).round() as u32
    }

    /// Returns a copy with a different question count.
    ///
    /// # Errors
    ///
    /// Returns `ExamConfigError::InvalidQuestionCount` for zero.
    pub fn with_question_count(&self, question_count: usize) -> Result<Self, ExamConfigError> {
        Self::new(
            self.total_duration_secs,
            question_count,
            self.marks_per_question,
            self.pass_ratio,
        )
    }

    /// Returns a copy with a different total duration.
    ///
    /// # Errors
    ///
    /// Returns `ExamConfigError::InvalidDuration` for zero.
    pub fn with_total_duration_secs(&self, secs: u32) -> Result<Self, ExamConfigError> {
        Self::new(
            secs,
            self.question_count,
            self.marks_per_question,
            self.pass_ratio,
        )
    }
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            total_duration_secs: Self::DEFAULT_TOTAL_DURATION_SECS,
            question_count: Self::DEFAULT_QUESTION_COUNT,
            marks_per_question: Self::DEFAULT_MARKS_PER_QUESTION,
            pass_ratio: Self::DEFAULT_PASS_RATIO,
        }
    }
}
