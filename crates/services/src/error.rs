//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::SessionError;
use exam_core::model::{BankSourceError, ExamConfigError};
use storage::StorageError;

/// Errors emitted by the advisory client.
///
/// Display strings are shown inline to the user.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdvisoryError {
    #[error("advisory service is not configured")]
    Disabled,
    #[error("please enter a question first")]
    EmptyQuery,
    #[error("advisory service returned an empty answer")]
    EmptyResponse,
    #[error("Error code {}", .0.as_u16())]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while starting or driving an exam.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamError {
    #[error("could not load the question bank: {0}")]
    BankLoad(#[from] StorageError),
    #[error("question bank has {available} questions but the exam needs {requested}")]
    BankTooSmall { available: usize, requested: usize },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while reading launch settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("invalid value for {name}: {raw}")]
    InvalidValue { name: &'static str, raw: String },
    #[error(transparent)]
    Config(#[from] ExamConfigError),
    #[error(transparent)]
    BankSource(#[from] BankSourceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
