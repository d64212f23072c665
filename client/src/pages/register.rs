//! Client self-registration page.

use eyeclinic::error::FieldErrors;
use eyeclinic::lifetime::Lifetime;
use eyeclinic::routes::paths;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::components::field::FormField;
use crate::state::auth::use_auth;
use crate::util::form::RegisterForm;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let password_confirmation = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let busy = RwSignal::new(false);

    let lifetime = Lifetime::new();
    on_cleanup({
        let lifetime = lifetime.clone();
        move || lifetime.end()
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let form = RegisterForm {
            name: name.get(),
            email: email.get(),
            password: password.get(),
            password_confirmation: password_confirmation.get(),
            phone: phone.get(),
        };
        let request = match form.validate() {
            Ok(request) => request,
            Err(local) => {
                errors.set(local);
                return;
            }
        };
        let Some(store) = auth.store() else {
            return;
        };
        errors.set(FieldErrors::new());
        busy.set(true);

        let lifetime = lifetime.clone();
        spawn_local(async move {
            let Some(result) = lifetime.scope(store.register(&request)).await else {
                return;
            };
            if let Err(e) = result {
                errors.set(e.field_errors().clone());
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Create an account"</h1>
                <FormField name="name" label="Full name" value=name errors=errors/>
                <FormField name="email" label="Email" input_type="email" value=email errors=errors/>
                <FormField name="phone" label="Phone (optional)" input_type="tel" value=phone errors=errors/>
                <FormField name="password" label="Password" input_type="password" value=password errors=errors/>
                <FormField
                    name="password_confirmation"
                    label="Confirm password"
                    input_type="password"
                    value=password_confirmation
                    errors=errors
                />
                <button class="auth-card__submit" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating account..." } else { "Register" }}
                </button>
                <p class="auth-card__alt">
                    "Already registered? "
                    <A href=paths::LOGIN>"Sign in"</A>
                </p>
            </form>
        </div>
    }
}
