use std::sync::Arc;

use dioxus::prelude::{ReadableExt, WritableExt};
use std::sync::atomic::{AtomicUsize, Ordering};

use exam_core::model::{ExamConfig, Question, QuestionId};
use services::{AdvisoryAnswer, AdvisoryClient, AdvisoryError, AdvisoryService};
use storage::{QuestionBankLoader, StorageError};

use super::test_harness::{
    ViewHarness, ViewKind, in_memory_bank, setup_attempt_with_advisory, setup_view_harness,
    setup_view_harness_with,
};
use crate::vm::ExamIntent;

#[tokio::test(flavor = "current_thread")]
async fn landing_view_smoke_renders_exam_details() {
    let mut harness = setup_view_harness(ViewKind::Landing, in_memory_bank(5));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Questions: 3"), "missing count in {html}");
    assert!(html.contains("Time: 20 minutes"), "missing time in {html}");
    assert!(html.contains("Max. Marks: 30"), "missing marks in {html}");
    assert!(html.contains("Passing: 70% (21 marks)"), "missing pass mark in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
}

async fn started(view: ViewKind, bank: Arc<dyn QuestionBankLoader>) -> ViewHarness {
    let mut harness = setup_view_harness(view, bank);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    harness
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_renders_first_question() {
    let harness = started(ViewKind::Attempt, in_memory_bank(5)).await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "missing counter in {html}");
    assert!(html.contains("Time Remaining: 20:00"), "missing timer in {html}");
    assert!(html.contains("Answered: 0 / 3"), "missing progress in {html}");
    assert!(html.contains("Check Answer"), "missing check in {html}");
    assert!(!html.contains("advisory-box"), "advisory shown while disabled in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_checks_and_submits() {
    let mut harness = started(ViewKind::Attempt, in_memory_bank(3)).await;
    let handles = harness.handles();
    let dispatch = handles.dispatch();

    harness
        .dom
        .in_runtime(|| dispatch.call(ExamIntent::Select("B".into())));
    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Check));
    harness.drive_async().await;
    let html = harness.render();
    assert!(
        html.contains("Wrong! The correct answer is <strong>A</strong>"),
        "missing feedback in {html}"
    );
    assert!(html.contains("Answered: 1 / 3"), "missing progress in {html}");

    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Select("A".into())));
    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Next));
    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Select("A".into())));
    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Submit));
    harness.drive_async().await;

    let score = harness
        .dom
        .in_runtime(|| {
            let vm = handles.vm();
            let guard = vm.read();
            guard.as_ref().and_then(|vm| vm.session().score().cloned())
        })
        .expect("submitted");
    assert_eq!(score.correct, 2);

    let html = harness.render();
    assert!(html.contains("Final Results"), "missing result in {html}");
    assert!(html.contains("Correct: 2 | Wrong: 1"), "missing counts in {html}");
    assert!(html.contains("66.67%"), "missing percentage in {html}");
    assert!(html.contains("New attempt"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_pauses() {
    let mut harness = started(ViewKind::Attempt, in_memory_bank(3)).await;
    let dispatch = harness.handles().dispatch();

    harness.dom.in_runtime(|| dispatch.call(ExamIntent::Pause));
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Exam paused"), "missing paused state in {html}");
    assert!(html.contains("Continue"), "missing continue in {html}");
    assert!(!html.contains("Check Answer"), "question visible while paused in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_reports_small_bank() {
    let harness = started(ViewKind::Attempt, in_memory_bank(2)).await;
    let html = harness.render();
    assert!(html.contains("does not have enough questions"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

struct FailingBank;

#[async_trait::async_trait]
impl QuestionBankLoader for FailingBank {
    async fn load(&self) -> Result<Vec<Question>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    fn describe(&self) -> String {
        "failing bank".to_string()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_renders_bank_error_state() {
    let mut harness =
        setup_view_harness_with(ViewKind::Attempt, Arc::new(FailingBank), ExamConfig::default());
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Could not load the question bank"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[derive(Default)]
struct SlowCountingClient {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl AdvisoryClient for SlowCountingClient {
    async fn ask(
        &self,
        qid: &QuestionId,
        _user_id: &str,
        _query: &str,
    ) -> Result<AdvisoryAnswer, AdvisoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        Ok(AdvisoryAnswer {
            answer: format!("Hint for {qid}"),
            source: "notes".to_string(),
        })
    }
}

#[tokio::test(flavor = "current_thread")]
async fn attempt_view_smoke_sends_one_advisory_request_per_click_burst() {
    let client = Arc::new(SlowCountingClient::default());
    let advisory = Arc::new(AdvisoryService::new(client.clone(), "student1"));
    let mut harness = setup_attempt_with_advisory(in_memory_bank(3), advisory);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    assert!(harness.render().contains("advisory-box"), "advisory panel missing");

    let handles = harness.advisory_handles();
    let ask = handles.ask();
    harness.dom.in_runtime(|| {
        let mut query = handles.query();
        query.set("Why A?".to_string());
    });
    harness.dom.in_runtime(|| ask.call(()));
    harness.dom.in_runtime(|| ask.call(()));
    harness.drive_async().await;
    harness.drive_async().await;
    harness.drive_async().await;

    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    let html = harness.render();
    assert!(html.contains("Hint for q"), "missing answer in {html}");
    assert!(html.contains("Source: notes"), "missing source in {html}");
}
