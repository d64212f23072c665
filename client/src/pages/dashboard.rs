//! Role dashboards and resource list pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted under each portal's guarded section. Lists are fetched through
//! `eyeclinic::resources` with the session's role and bearer token, so the
//! endpoint a page hits always matches the portal it is rendered in.
//!
//! DESIGN
//! ======
//! Each page owns a `Lifetime` ended in `on_cleanup`; a fetch that resolves
//! after the user navigated away resolves to `Cancelled` and is dropped.

use eyeclinic::ApiError;
use eyeclinic::lifetime::Lifetime;
use eyeclinic::resources::{ResourceKind, fetch_summaries};
use eyeclinic::routes::Layout;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::use_auth;
use crate::util::nav::nav_links;

/// Greeting plus shortcuts to the rest of the user's portal.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <section class="dashboard">
            {move || {
                auth.session.get().user.map(|user| {
                    let home = user.role.home_route();
                    let shortcuts = nav_links(Layout::Account.for_role(Some(user.role)))
                        .into_iter()
                        .filter(|link| link.href != home)
                        .map(|link| view! { <li><A href=link.href>{link.label}</A></li> })
                        .collect_view();
                    view! {
                        <h1>{format!("Welcome, {}", user.name)}</h1>
                        <p class="dashboard__role">{format!("{} portal", user.role)}</p>
                        <ul class="dashboard__shortcuts">{shortcuts}</ul>
                    }
                })
            }}
        </section>
    }
}

/// One-line summaries of `kind` as visible to the current role.
#[component]
pub fn ResourcePage(kind: ResourceKind, title: &'static str) -> impl IntoView {
    let auth = use_auth();
    let lifetime = Lifetime::new();
    on_cleanup({
        let lifetime = lifetime.clone();
        move || lifetime.end()
    });

    let rows = LocalResource::new(move || {
        let role = auth.session.get().role();
        let store = auth.store();
        let lifetime = lifetime.clone();
        async move {
            let store = store.ok_or(ApiError::Cancelled)?;
            let token = store.token();
            lifetime
                .scope(fetch_summaries(store.api(), kind, role, token.as_deref()))
                .await
                .unwrap_or(Err(ApiError::Cancelled))
        }
    });

    view! {
        <section class="resource-page">
            <h1>{title}</h1>
            <Suspense fallback=|| view! { <p class="resource-page__loading">"Loading..."</p> }>
                {move || rows.get().map(render_rows)}
            </Suspense>
        </section>
    }
}

fn render_rows(result: Result<Vec<String>, ApiError>) -> AnyView {
    match result {
        Ok(lines) if lines.is_empty() => view! { <p class="resource-page__empty">"Nothing here yet."</p> }.into_any(),
        Ok(lines) => view! {
            <ul class="resource-page__rows">
                {lines.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
            </ul>
        }
        .into_any(),
        Err(ApiError::Cancelled) => ().into_any(),
        Err(e) => {
            tracing::warn!(error = %e, "resource fetch failed");
            view! { <p class="resource-page__error">{e.user_message()}</p> }.into_any()
        }
    }
}
