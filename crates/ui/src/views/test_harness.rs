use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::{AnswerKey, AnswerOption, ExamConfig, OptionKey, Question, QuestionId};
use exam_core::time::fixed_now;
use services::{AdvisoryService, Clock, ExamLoopService};
use storage::{InMemoryQuestionBank, QuestionBankLoader};

use crate::context::{UiApp, build_app_context};
use crate::views::exam::{AdvisoryTestHandles, ExamTestHandles};
use crate::views::{AttemptView, LandingView};

#[derive(Clone)]
struct TestApp {
    config: ExamConfig,
    exam_loop: Arc<ExamLoopService>,
    advisory: Arc<AdvisoryService>,
}

impl UiApp for TestApp {
    fn exam_config(&self) -> ExamConfig {
        self.config.clone()
    }

    fn exam_loop(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam_loop)
    }

    fn advisory(&self) -> Arc<AdvisoryService> {
        Arc::clone(&self.advisory)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Attempt,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    exam_handles: Option<ExamTestHandles>,
    advisory_handles: AdvisoryTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.exam_handles.clone() {
        use_context_provider(|| handles);
    }
    let advisory_handles = props.advisory_handles.clone();
    use_context_provider(|| advisory_handles);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Attempt => rsx! { AttemptView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub exam_handles: Option<ExamTestHandles>,
    pub advisory_handles: AdvisoryTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn handles(&self) -> ExamTestHandles {
        self.exam_handles.clone().expect("exam handles")
    }

    pub fn advisory_handles(&self) -> AdvisoryTestHandles {
        self.advisory_handles.clone()
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Bank of `size` questions whose correct key is always `A`.
pub fn sample_bank(size: usize) -> Vec<Question> {
    (0..size)
        .map(|i| {
            Question::new(
                QuestionId::new(format!("q{i}")).expect("qid"),
                format!("Which service fits case {i}?"),
                vec![
                    AnswerOption::new(OptionKey::new("A").expect("key"), format!("Right {i}")),
                    AnswerOption::new(OptionKey::new("B").expect("key"), format!("Wrong {i}")),
                ],
                AnswerKey::Single(OptionKey::new("A").expect("key")),
            )
            .expect("question")
        })
        .collect()
}

pub fn setup_view_harness(view: ViewKind, bank: Arc<dyn QuestionBankLoader>) -> ViewHarness {
    setup_view_harness_with(view, bank, ExamConfig::new(1200, 3, 10, 0.7).expect("config"))
}

pub fn setup_view_harness_with(
    view: ViewKind,
    bank: Arc<dyn QuestionBankLoader>,
    config: ExamConfig,
) -> ViewHarness {
    build_harness(view, bank, config, Arc::new(AdvisoryService::disabled()))
}

/// Attempt view with a live advisory panel backed by `advisory`.
pub fn setup_attempt_with_advisory(
    bank: Arc<dyn QuestionBankLoader>,
    advisory: Arc<AdvisoryService>,
) -> ViewHarness {
    let config = ExamConfig::new(1200, 3, 10, 0.7).expect("config");
    build_harness(ViewKind::Attempt, bank, config, advisory)
}

fn build_harness(
    view: ViewKind,
    bank: Arc<dyn QuestionBankLoader>,
    config: ExamConfig,
    advisory: Arc<AdvisoryService>,
) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let exam_loop = Arc::new(ExamLoopService::new(clock, bank, config.clone()).with_seed(Some(3)));
    let app = Arc::new(TestApp {
        config,
        exam_loop,
        advisory,
    });
    let exam_handles = match view {
        ViewKind::Attempt => Some(ExamTestHandles::default()),
        ViewKind::Landing => None,
    };
    let advisory_handles = AdvisoryTestHandles::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            exam_handles: exam_handles.clone(),
            advisory_handles: advisory_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        exam_handles,
        advisory_handles,
    }
}

pub fn in_memory_bank(size: usize) -> Arc<dyn QuestionBankLoader> {
    Arc::new(InMemoryQuestionBank::new(sample_bank(size)))
}
