use thiserror::Error;

use crate::model::{BankSourceError, ExamConfigError, QuestionError};
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Config(#[from] ExamConfigError),
    #[error(transparent)]
    BankSource(#[from] BankSourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
