mod config;
mod ids;
mod question;
mod score;
mod source;

pub use config::{ExamConfig, ExamConfigError};
pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{AnswerKey, AnswerOption, OptionKey, Question, QuestionError};
pub use score::ExamScore;
pub use source::{BankSource, BankSourceError};
