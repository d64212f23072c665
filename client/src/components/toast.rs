//! Stack of transient session notices.

use leptos::prelude::*;

use crate::state::toast::{Toast, ToastState};

/// Renders the toast stack; clicking a toast dismisses it.
#[component]
pub fn ToastStack() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || toasts.get().items
                key=|toast| toast.id
                children=move |toast: Toast| {
                    let id = toast.id;
                    let class = toast.class();
                    view! {
                        <div class=class on:click=move |_| toasts.update(|t| t.dismiss(id))>
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
