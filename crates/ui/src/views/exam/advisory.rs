use dioxus::prelude::*;
use exam_core::model::QuestionId;
use services::AdvisoryReply;

use crate::context::AppContext;
use crate::vm::markdown_to_html;

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Free-text question about the current exam question. Keyed by question so
/// the input and reply reset on navigation.
#[component]
pub(super) fn AdvisoryPanel(qid: QuestionId) -> Element {
    let ctx = use_context::<AppContext>();
    let advisory = ctx.advisory();

    let mut query = use_signal(String::new);
    let reply = use_signal(|| None::<AdvisoryReply>);
    let mut asking = use_signal(|| false);

    let enabled = advisory.enabled();
    let on_ask = use_callback(move |()| {
        // Claimed before spawning so a second click cannot start another request.
        if *asking.peek() {
            return;
        }
        asking.set(true);
        let advisory = advisory.clone();
        let qid = qid.clone();
        let text = query.read().clone();
        let mut reply = reply;
        let mut asking = asking;
        spawn(async move {
            let answer = advisory.ask(qid, text).await;
            reply.set(Some(answer));
            asking.set(false);
        });
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<AdvisoryTestHandles>() {
                handles.register(on_ask, query);
            }
        }
    }

    if !enabled {
        return rsx! {};
    }

    let reply_value = reply.read().clone();
    let answer_html = reply_value
        .as_ref()
        .and_then(|reply| reply.answer.as_deref())
        .map(markdown_to_html);

    rsx! {
        div { class: "advisory-box",
            h3 { "Ask about this question" }
            input {
                r#type: "text",
                id: "advisory-query",
                placeholder: "E.g., 'Why is option A incorrect?'",
                value: "{query}",
                oninput: move |evt: FormEvent| query.set(evt.value()),
            }
            button {
                class: "btn btn-secondary",
                id: "advisory-ask",
                r#type: "button",
                disabled: asking(),
                onclick: move |_| on_ask.call(()),
                if asking() { "Asking..." } else { "Ask" }
            }
            if let Some(reply) = reply_value {
                if let Some(html) = answer_html {
                    div { class: "advisory-answer",
                        div { dangerous_inner_html: "{html}" }
                        p { class: "advisory-source", "Source: {reply.source}" }
                    }
                } else {
                    p { class: "advisory-error", "Response error: {reply.source}" }
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct AdvisoryTestHandles {
    ask: Rc<RefCell<Option<Callback<()>>>>,
    query: Rc<RefCell<Option<Signal<String>>>>,
}

#[cfg(test)]
impl AdvisoryTestHandles {
    pub(crate) fn register(&self, ask: Callback<()>, query: Signal<String>) {
        *self.ask.borrow_mut() = Some(ask);
        *self.query.borrow_mut() = Some(query);
    }

    pub(crate) fn ask(&self) -> Callback<()> {
        (*self.ask.borrow()).expect("advisory ask registered")
    }

    pub(crate) fn query(&self) -> Signal<String> {
        (*self.query.borrow()).expect("advisory query registered")
    }
}
