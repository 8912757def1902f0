use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::exams::ExamDetailsView;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn LandingView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let details = ExamDetailsView::from_config(ctx.exam_config());

    rsx! {
        div { class: "page landing-page",
            div { class: "title", "Practice Test Assistant" }
            div { class: "subtitle", "Exam Instructions" }
            ul { class: "landing-instructions",
                li { "Each question has one correct option. Pick it and press Check Answer to see feedback." }
                li { "Checking an answer never changes your score; only the answers you leave selected count." }
                li { "The timer keeps running while you move between questions. Pause stops it." }
                li { "When the time runs out the exam is submitted automatically." }
            }
            div { class: "subtitle", "Exam Details" }
            p { "Questions: {details.question_count}" }
            p { "Time: {details.duration_minutes} minutes" }
            p { "Max. Marks: {details.max_marks}" }
            p { "Passing: {details.pass_percent}% ({details.pass_marks} marks)" }
            button {
                class: "btn btn-primary",
                id: "landing-start",
                r#type: "button",
                onclick: move |_| {
                    let _ = navigator.push(Route::Attempt {});
                },
                "Start Quiz"
            }
        }
    }
}
