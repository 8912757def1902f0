#![forbid(unsafe_code)]

pub mod json;
pub mod remote;
pub mod repository;
mod source;
pub mod sqlite;

pub use repository::{InMemoryQuestionBank, QuestionBankLoader, QuestionRecord, Storage, StorageError};
