use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::ExamView;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ExamIntent, ExamVm, LOW_TIME_SECS, start_exam, timer_label};

use super::advisory::AdvisoryPanel;
use super::quiz::QuizPanel;
use super::result::ResultPanel;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK_INTERVAL: Duration = Duration::from_millis(500);

#[component]
pub fn AttemptView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let exam_loop = ctx.exam_loop();

    let mut vm = use_signal(|| None::<ExamVm>);
    let mut error = use_signal(|| None::<ViewError>);

    let mut resource = use_resource(move || {
        let exam_loop = exam_loop.clone();
        let mut vm = vm;
        let mut error = error;
        async move {
            let started = start_exam(exam_loop).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    // Drives the countdown and the time-up submission while an attempt is open.
    use_future(move || {
        let mut vm = vm;
        async move {
            loop {
                tokio::time::sleep(TICK_INTERVAL).await;
                let running = vm.peek().as_ref().is_some_and(|vm| !vm.is_submitted());
                if !running {
                    continue;
                }
                if let Some(vm) = vm.write().as_mut() {
                    vm.tick();
                }
            }
        }
    });

    let dispatch_intent = use_callback(move |intent: ExamIntent| {
        let result = match vm.write().as_mut() {
            Some(vm) => vm.dispatch(intent),
            None => Err(ViewError::Unknown),
        };
        error.set(result.err());
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<ExamTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let on_restart = use_callback(move |()| {
        vm.set(None);
        error.set(None);
        resource.restart();
    });

    // Time-up check on every render; the signal is only written when it submits.
    let expired = vm.peek().as_ref().is_some_and(ExamVm::is_expired);
    let frame = if expired {
        vm.write().as_mut().map(ExamVm::frame)
    } else {
        vm.read().as_ref().map(ExamVm::view)
    };
    let qid = vm.read().as_ref().map(ExamVm::current_qid);

    let on_key = use_callback(move |evt: KeyboardEvent| {
        let in_quiz = vm
            .read()
            .as_ref()
            .is_some_and(|vm| !vm.is_submitted() && !vm.session().is_paused());
        if !in_quiz {
            return;
        }
        match evt.data.key() {
            Key::ArrowLeft => {
                evt.prevent_default();
                dispatch_intent.call(ExamIntent::Previous);
            }
            Key::ArrowRight => {
                evt.prevent_default();
                dispatch_intent.call(ExamIntent::Next);
            }
            _ => {}
        }
    });

    rsx! {
        div { class: "page exam-page", id: "exam-root", tabindex: "0", onkeydown: on_key,
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading questions..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "exam-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        id: "exam-retry",
                        r#type: "button",
                        onclick: move |_| resource.restart(),
                        "Retry"
                    }
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| {
                            let _ = navigator.push(Route::Landing {});
                        },
                        "Back"
                    }
                },
                ViewState::Ready(()) => match frame {
                    Some(ExamView::Quiz(quiz)) => rsx! {
                        div { class: "exam-layout",
                            aside { class: "exam-sidebar",
                                span {
                                    class: if quiz.remaining_secs <= LOW_TIME_SECS { "exam-timer exam-timer--low" } else { "exam-timer" },
                                    id: "exam-timer-label",
                                    "{timer_label(quiz.remaining_secs)}"
                                }
                                span { class: "exam-progress",
                                    "Answered: {quiz.progress.answered} / {quiz.progress.total}"
                                }
                                span { class: "exam-progress", "Checked: {quiz.progress.checked}" }
                                if quiz.paused {
                                    button {
                                        class: "btn btn-primary",
                                        id: "exam-resume",
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(ExamIntent::Resume),
                                        "Continue"
                                    }
                                } else {
                                    button {
                                        class: "btn btn-secondary",
                                        id: "exam-pause",
                                        r#type: "button",
                                        onclick: move |_| dispatch_intent.call(ExamIntent::Pause),
                                        "Pause"
                                    }
                                }
                                button {
                                    class: "btn btn-primary",
                                    id: "exam-submit",
                                    r#type: "button",
                                    onclick: move |_| dispatch_intent.call(ExamIntent::Submit),
                                    "Submit Quiz"
                                }
                            }
                            section { class: "exam-main",
                                if let Some(err) = *error.read() {
                                    p { class: "exam-error", "{err.message()}" }
                                }
                                if quiz.paused {
                                    div { class: "paused-box",
                                        h3 { "Exam paused" }
                                        p { "The timer is stopped. Press Continue to carry on." }
                                    }
                                } else {
                                    QuizPanel { quiz: quiz.clone(), on_intent: dispatch_intent }
                                    if let Some(qid) = qid {
                                        AdvisoryPanel { key: "{qid}", qid: qid.clone() }
                                    }
                                }
                            }
                        }
                    },
                    Some(ExamView::Result(result)) => rsx! {
                        ResultPanel { result, on_restart }
                    },
                    Some(ExamView::Landing(_)) | None => rsx! {
                        p { "Loading questions..." }
                    },
                },
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct ExamTestHandles {
    dispatch: Rc<RefCell<Option<Callback<ExamIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<ExamVm>>>>>,
}

#[cfg(test)]
impl ExamTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<ExamIntent>, vm: Signal<Option<ExamVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<ExamIntent> {
        (*self.dispatch.borrow()).expect("exam dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<ExamVm>> {
        (*self.vm.borrow()).expect("exam vm registered")
    }
}
