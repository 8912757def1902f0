use std::sync::Arc;

use exam_core::model::{ExamConfig, ExamScore};
use exam_core::{Clock, ExamSession};
use storage::QuestionBankLoader;

use super::plan::ExamPlanBuilder;
use super::view::ExamView;
use crate::error::ExamError;

/// A user action forwarded by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExamAction {
    Select { index: usize, key: String },
    Check { index: usize },
    GoTo { index: usize },
    Previous,
    Next,
    Pause,
    Resume,
    Submit,
}

/// Orchestrates exam start, actions and per-frame view assembly.
///
/// Sessions are owned by the caller; this service only supplies the bank,
/// the config and the clock.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBankLoader>,
    config: ExamConfig,
    seed: Option<u64>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBankLoader>, config: ExamConfig) -> Self {
        Self {
            clock,
            bank,
            config,
            seed: None,
        }
    }

    /// Fix the sampling seed so every attempt gets the same questions.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Load the bank, sample the questions and start the countdown.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::BankLoad` if the bank cannot be loaded and
    /// `ExamError::BankTooSmall` if it cannot fill the exam.
    pub async fn start_exam(&self) -> Result<ExamSession, ExamError> {
        let bank = self.bank.load().await.map_err(|err| {
            tracing::warn!(source = %self.bank.describe(), error = %err, "question bank load failed");
            ExamError::BankLoad(err)
        })?;
        let plan = ExamPlanBuilder::new(&self.config)
            .with_seed(self.seed)
            .build(&bank)?;
        let session = ExamSession::start(self.config.clone(), plan.questions, self.clock.now())?;

        tracing::info!(
            session = %session.id(),
            bank_size = plan.bank_size,
            questions = session.len(),
            total_secs = self.config.total_duration_secs(),
            "exam started"
        );
        Ok(session)
    }

    /// Run the time-up check. Returns true when the exam was auto-submitted.
    pub fn tick(&self, session: &mut ExamSession) -> bool {
        let expired = session.tick(self.clock.now());
        if expired {
            log_submission(session, "time up");
        }
        expired
    }

    /// Time-up check followed by the view for this frame.
    pub fn render(&self, session: &mut ExamSession) -> ExamView {
        self.tick(session);
        ExamView::for_session(session, self.clock.now())
    }

    /// Apply one user action.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Session` when the session rejects the action; the
    /// session is left unchanged apart from a possible time-up submission.
    pub fn apply(&self, session: &mut ExamSession, action: ExamAction) -> Result<(), ExamError> {
        let now = self.clock.now();
        let was_submitted = session.is_submitted();
        let result = match action {
            ExamAction::Select { index, key } => session.select_option(index, &key, now),
            ExamAction::Check { index } => session.check_answer(index, now).map(|_| ()),
            ExamAction::GoTo { index } => session.go_to(index, now),
            ExamAction::Previous => session.previous(now),
            ExamAction::Next => session.next(now),
            ExamAction::Pause => session.pause(now),
            ExamAction::Resume => session.resume(now),
            ExamAction::Submit => {
                self.submit(session);
                Ok(())
            }
        };
        if !was_submitted && session.is_submitted() && result.is_err() {
            log_submission(session, "time up");
        }
        result.map_err(|err| {
            tracing::debug!(session = %session.id(), error = %err, "exam action rejected");
            ExamError::Session(err)
        })
    }

    /// Submit and score the exam. Repeated calls return the stored score.
    ///
    /// An exam that already ran out of time is submitted by the time-up check.
    pub fn submit(&self, session: &mut ExamSession) -> ExamScore {
        self.tick(session);
        let was_submitted = session.is_submitted();
        let score = session.submit(self.clock.now());
        if !was_submitted {
            log_submission(session, "manual");
        }
        score
    }
}

fn log_submission(session: &ExamSession, trigger: &'static str) {
    if let Some(score) = session.score() {
        tracing::info!(
            session = %session.id(),
            trigger,
            score = score.score,
            max_marks = score.max_marks,
            passed = score.passed(),
            "exam submitted"
        );
    }
}
