use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::exams::ResultView;

use crate::routes::Route;

#[component]
pub(super) fn ResultPanel(result: ResultView, on_restart: EventHandler<()>) -> Element {
    let navigator = use_navigator();
    let (verdict_class, verdict) = if result.passed {
        ("result-pass", "Passed. Well done!")
    } else {
        ("result-fail", "Not passed this time. Review the topics and try again.")
    };

    rsx! {
        div { class: "result-box", id: "exam-result",
            div { class: "title", "Final Results" }
            p { "Correct: {result.correct} | Wrong: {result.wrong}" }
            p { "Score: " b { "{result.score} / {result.max_marks}" } }
            p { "Percentage: " b { "{result.percent_label}" } }
            p { "Pass mark: {result.pass_marks}" }
            p { class: "{verdict_class}", "{verdict}" }
            div { class: "exam-nav",
                button {
                    class: "btn btn-primary",
                    id: "exam-new-attempt",
                    r#type: "button",
                    onclick: move |_| on_restart.call(()),
                    "New attempt"
                }
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| {
                        let _ = navigator.push(Route::Landing {});
                    },
                    "Back to start"
                }
            }
        }
    }
}
