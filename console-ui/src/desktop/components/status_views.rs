use dioxus::prelude::*;

#[component]
pub fn LoadingState(label: String) -> Element {
    rsx! {
        div {
            style: "display: flex; align-items: center; justify-content: center; padding: 1.5rem; color: var(--text-muted, #6b7280);",
            "{label}"
        }
    }
}

#[component]
pub fn ErrorState(title: String, error: String, on_retry: Option<Callback<()>>) -> Element {
    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 1.5rem; color: var(--danger-text, #ef4444); text-align: center;",
            p { style: "font-weight: 500; margin-bottom: 0.5rem;", "{title}" }
            p { style: "font-size: 0.875rem; color: var(--text-secondary, #9ca3af);", "{error}" }
            if let Some(on_retry) = on_retry {
                button { onclick: move |_| on_retry.call(()), "Retry" }
            }
        }
    }
}
