use dioxus::prelude::*;
use services::exams::{OptionView, QuizView};

use crate::vm::{ExamIntent, inline_markdown_to_html};

#[component]
pub(super) fn QuizPanel(quiz: QuizView, on_intent: EventHandler<ExamIntent>) -> Element {
    let feedback = quiz.feedback.clone().map(|feedback| {
        let class = if feedback.correct {
            "feedback feedback--correct"
        } else {
            "feedback feedback--wrong"
        };
        (class, inline_markdown_to_html(&feedback.message))
    });

    rsx! {
        div { class: "question-box",
            p { class: "question-counter", "Question {quiz.number} of {quiz.total}" }
            p { class: "question-prompt",
                b { "Question {quiz.number}: " }
                "{quiz.prompt}"
            }
            p { class: "question-hint", "Select your answer:" }
            ul { class: "question-options",
                for option in quiz.options.iter().cloned() {
                    OptionRow {
                        key: "{quiz.qid}-{option.key}",
                        group: quiz.qid.clone(),
                        option,
                        on_intent,
                    }
                }
            }
            button {
                class: "btn btn-secondary",
                id: "exam-check",
                r#type: "button",
                onclick: move |_| on_intent.call(ExamIntent::Check),
                "Check Answer"
            }
            if let Some((class, html)) = feedback {
                div { class: "{class}", id: "exam-feedback", dangerous_inner_html: "{html}" }
            }
        }
        div { class: "exam-nav",
            button {
                class: "btn",
                id: "exam-prev",
                r#type: "button",
                disabled: quiz.prev_disabled,
                onclick: move |_| on_intent.call(ExamIntent::Previous),
                "Previous"
            }
            button {
                class: "btn",
                id: "exam-next",
                r#type: "button",
                disabled: quiz.next_disabled,
                onclick: move |_| on_intent.call(ExamIntent::Next),
                "Next"
            }
        }
    }
}

#[component]
fn OptionRow(group: String, option: OptionView, on_intent: EventHandler<ExamIntent>) -> Element {
    let key = option.key.clone();
    let input_id = format!("option-{group}-{}", option.key);

    rsx! {
        li { class: "question-option",
            label { r#for: "{input_id}",
                input {
                    r#type: "radio",
                    id: "{input_id}",
                    name: "answer-{group}",
                    value: "{option.key}",
                    checked: option.selected,
                    onchange: move |_| on_intent.call(ExamIntent::Select(key.clone())),
                }
                span { class: "question-option__key", "{option.key}." }
                span { class: "question-option__text", "{option.text}" }
            }
        }
    }
}
