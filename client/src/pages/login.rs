//! Email + password login page.
//!
//! Local validation runs first; API field errors from a rejected login are
//! shown inline under the same fields. Success needs no handling here: the
//! session change makes `GuestOnly` redirect to the role home.

use eyeclinic::error::FieldErrors;
use eyeclinic::lifetime::Lifetime;
use eyeclinic::routes::paths;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::components::field::FormField;
use crate::state::auth::use_auth;
use crate::util::form::LoginForm;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
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
        let form = LoginForm { email: email.get(), password: password.get() };
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
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
            let Some(result) = lifetime.scope(store.login(&credentials)).await else {
                return;
            };
            if let Err(e) = result {
                errors.set(e.field_errors().clone());
                password.set(String::new());
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Sign in"</h1>
                <FormField name="email" label="Email" input_type="email" value=email errors=errors/>
                <FormField name="password" label="Password" input_type="password" value=password errors=errors/>
                <button class="auth-card__submit" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                </button>
                <p class="auth-card__alt">
                    "No account yet? "
                    <A href=paths::REGISTER>"Register"</A>
                </p>
            </form>
        </div>
    }
}
