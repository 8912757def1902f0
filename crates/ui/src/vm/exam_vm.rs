use std::sync::Arc;

use exam_core::ExamSession;
use exam_core::model::QuestionId;
use services::{ExamAction, ExamError, ExamLoopService, ExamView};

use crate::views::ViewError;

/// A user intent on the question currently shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExamIntent {
    Select(String),
    Check,
    GoTo(usize),
    Previous,
    Next,
    Pause,
    Resume,
    Submit,
}

/// Owns the running session for the exam screen.
pub struct ExamVm {
    session: ExamSession,
    exam_loop: Arc<ExamLoopService>,
}

impl ExamVm {
    #[must_use]
    pub fn new(session: ExamSession, exam_loop: Arc<ExamLoopService>) -> Self {
        Self { session, exam_loop }
    }

    #[must_use]
    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    #[must_use]
    pub fn current_qid(&self) -> QuestionId {
        self.session.current_question().id().clone()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.session.is_submitted()
    }

    /// Frame for the current instant without the time-up check. Only valid while
    /// `is_expired` is false.
    #[must_use]
    pub fn view(&self) -> ExamView {
        ExamView::for_session(&self.session, self.exam_loop.clock().now())
    }

    /// Frame for the current instant, submitting first if the countdown ran out.
    pub fn frame(&mut self) -> ExamView {
        self.exam_loop.render(&mut self.session)
    }

    /// True when the countdown has run out on an exam that is still open.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        !self.session.is_submitted()
            && self.session.remaining_seconds(self.exam_loop.clock().now()) == 0
    }

    /// Returns true when the countdown ran out and the exam was submitted.
    pub fn tick(&mut self) -> bool {
        self.exam_loop.tick(&mut self.session)
    }

    /// # Errors
    ///
    /// Returns `ViewError::Rejected` when the session refuses the action.
    pub fn dispatch(&mut self, intent: ExamIntent) -> Result<(), ViewError> {
        let index = self.session.current_index();
        let action = match intent {
            ExamIntent::Select(key) => ExamAction::Select { index, key },
            ExamIntent::Check => ExamAction::Check { index },
            ExamIntent::GoTo(index) => ExamAction::GoTo { index },
            ExamIntent::Previous => ExamAction::Previous,
            ExamIntent::Next => ExamAction::Next,
            ExamIntent::Pause => ExamAction::Pause,
            ExamIntent::Resume => ExamAction::Resume,
            ExamIntent::Submit => ExamAction::Submit,
        };
        self.exam_loop
            .apply(&mut self.session, action)
            .map_err(|err| ViewError::from(&err))
    }
}

/// # Errors
///
/// Returns `ViewError::BankLoad` or `ViewError::BankTooSmall` when the exam
/// cannot be assembled, `ViewError::Unknown` otherwise.
pub async fn start_exam(exam_loop: Arc<ExamLoopService>) -> Result<ExamVm, ViewError> {
    let session = exam_loop
        .start_exam()
        .await
        .map_err(|err| ViewError::from(&err))?;
    Ok(ExamVm::new(session, exam_loop))
}

impl From<&ExamError> for ViewError {
    fn from(err: &ExamError) -> Self {
        match err {
            ExamError::BankLoad(_) => Self::BankLoad,
            ExamError::BankTooSmall { .. } => Self::BankTooSmall,
            ExamError::Session(_) => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}
