//! Public landing page.

use eyeclinic::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::use_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let home = move || auth.session.get().role().map(|r| r.home_route());

    view! {
        <section class="home">
            <h1>"Eye Clinic"</h1>
            <p>"Book eye exams, manage prescriptions and shop for eyewear."</p>
            <div class="home__actions">
                <A href="/shop">"Browse the shop"</A>
                {move || match home() {
                    Some(href) => view! { <A href=href>"Go to your dashboard"</A> }.into_any(),
                    None => view! { <A href=paths::LOGIN>"Sign in"</A> }.into_any(),
                }}
            </div>
        </section>
    }
}
