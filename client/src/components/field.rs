//! Labelled form inputs with inline validation messages.

use eyeclinic::error::FieldErrors;
use leptos::prelude::*;

use crate::util::form::first_error;

/// Text input bound to `value`, showing the first error for `name`.
#[component]
pub fn FormField(
    name: &'static str,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<FieldErrors>,
) -> impl IntoView {
    let message = move || errors.with(|e| first_error(e, name).map(str::to_owned));

    view! {
        <label class="form-field">
            <span class="form-field__label">{label}</span>
            <input
                class="form-field__input"
                class:form-field__input--invalid=move || message().is_some()
                type=input_type
                name=name
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <Show when=move || message().is_some()>
                <span class="form-field__error">{move || message().unwrap_or_default()}</span>
            </Show>
        </label>
    }
}
