mod plan;
mod view;
mod workflow;

// Public API of the exam subsystem.
pub use crate::error::ExamError;
pub use plan::{ExamPlan, ExamPlanBuilder, sample_questions};
pub use view::{
    ExamDetailsView, ExamPage, ExamView, FeedbackView, OptionView, QuizView, ResultView,
    format_remaining,
};
pub use workflow::{ExamAction, ExamLoopService};
