#![forbid(unsafe_code)]

pub mod advisory_service;
pub mod app_services;
pub mod error;
pub mod exams;
pub mod settings;

pub use exam_core::Clock;

pub use advisory_service::{
    AdvisoryAnswer, AdvisoryClient, AdvisoryConfig, AdvisoryReply, AdvisoryService,
    HttpAdvisoryClient,
};
pub use app_services::AppServices;
pub use error::{AdvisoryError, AppServicesError, ExamError, SettingsError};
pub use exams::{ExamAction, ExamLoopService, ExamPage, ExamView};
pub use settings::ExamSettings;
