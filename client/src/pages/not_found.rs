//! Fallback for paths outside the route table.

use eyeclinic::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"Page not found"</h1>
            <A href=paths::LANDING>"Back to the clinic"</A>
        </section>
    }
}
