use std::sync::Arc;

use exam_core::model::ExamConfig;
use services::{AdvisoryService, ExamLoopService};

pub trait UiApp: Send + Sync {
    fn exam_config(&self) -> ExamConfig;

    fn exam_loop(&self) -> Arc<ExamLoopService>;
    fn advisory(&self) -> Arc<AdvisoryService>;
}

#[derive(Clone)]
pub struct AppContext {
    exam_config: ExamConfig,
    exam_loop: Arc<ExamLoopService>,
    advisory: Arc<AdvisoryService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            exam_config: app.exam_config(),
            exam_loop: app.exam_loop(),
            advisory: app.advisory(),
        }
    }

    #[must_use]
    pub fn exam_config(&self) -> &ExamConfig {
        &self.exam_config
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
