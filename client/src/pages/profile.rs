//! Read-only view of the logged-in user's profile.

use leptos::prelude::*;

use crate::state::auth::use_auth;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <section class="profile">
            <h1>"Profile"</h1>
            {move || {
                auth.session.get().user.map(|user| {
                    let optional = [
                        ("Phone", user.phone),
                        ("Address", user.address),
                        ("Date of birth", user.date_of_birth),
                    ];
                    view! {
                        <dl class="profile__fields">
                            <dt>"Name"</dt>
                            <dd>{user.name}</dd>
                            <dt>"Email"</dt>
                            <dd>{user.email}</dd>
                            <dt>"Role"</dt>
                            <dd>{user.role.to_string()}</dd>
                            {optional
                                .into_iter()
                                .filter_map(|(label, value)| value.map(|v| view! { <dt>{label}</dt><dd>{v}</dd> }))
                                .collect_view()}
                        </dl>
                    }
                })
            }}
        </section>
    }
}
