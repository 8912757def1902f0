use std::sync::Arc;

use exam_core::model::ExamConfig;
use storage::Storage;

use crate::Clock;
use crate::advisory_service::AdvisoryService;
use crate::error::AppServicesError;
use crate::exams::ExamLoopService;
use crate::settings::ExamSettings;

/// Assembles app-facing services from the configured question bank.
#[derive(Clone)]
pub struct AppServices {
    config: ExamConfig,
    exam_loop: Arc<ExamLoopService>,
    advisory: Arc<AdvisoryService>,
}

impl AppServices {
    /// Build services from launch settings, opening the configured bank source.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bank source cannot be opened. The bank
    /// contents are only read when an exam starts.
    pub async fn from_settings(
        settings: &ExamSettings,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::from_source(&settings.bank).await?;
        Ok(Self::new(
            &storage,
            clock,
            settings.config.clone(),
            settings.seed,
            AdvisoryService::from_env(),
        ))
    }

    #[must_use]
    pub fn new(
        storage: &Storage,
        clock: Clock,
        config: ExamConfig,
        seed: Option<u64>,
        advisory: AdvisoryService,
    ) -> Self {
        let exam_loop = ExamLoopService::new(clock, Arc::clone(&storage.bank), config.clone())
            .with_seed(seed);
        Self {
            config,
            exam_loop: Arc::new(exam_loop),
            advisory: Arc::new(advisory),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    #[must_use]
    pub fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    #[must_use]
    pub fn advisory(&self) -> Arc<AdvisoryService> {
        Arc::clone(&self.advisory)
    }
}
