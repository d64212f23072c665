//! Shown when a logged-in user opens another role's portal.

use eyeclinic::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::use_auth;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let auth = use_auth();
    let back = move || auth.session.get().role().map_or(paths::LOGIN, |r| r.home_route()).to_owned();

    view! {
        <section class="unauthorized">
            <h1>"Unauthorized"</h1>
            <p>"Your account does not have access to that page."</p>
            <A href=back>"Return to your portal"</A>
        </section>
    }
}
