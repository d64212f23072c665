//! Route guard components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin renderers over `eyeclinic::guard`: the decision is computed from the
//! session snapshot and interpreted here as a loading placeholder, a
//! `<Redirect>`, or the wrapped children. No authorization logic lives in
//! this module.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use eyeclinic::guard::{guest_only, require_auth};
use eyeclinic::{GuardDecision, Role};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_navigate;

use crate::state::auth::use_auth;

/// Render `children` only for a logged-in user whose role is in `roles`
/// (any role when `roles` is omitted).
#[component]
pub fn RequireAuth(#[prop(optional)] roles: Option<&'static [Role]>, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let decision =
        Memo::new(move |_| gate(auth.pending_navigation.get().as_deref(), require_auth(&auth.session.get(), roles)));
    render_decision(decision, children)
}

/// Render `children` only when nobody is logged in; a logged-in user is
/// sent to their role home.
#[component]
pub fn GuestOnly(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let decision = Memo::new(move |_| gate(auth.pending_navigation.get().as_deref(), guest_only(&auth.session.get())));
    render_decision(decision, children)
}

/// Applies navigation requested by the session store (logout → landing).
///
/// Must sit inside `<Router>`; the store itself has no router access.
#[component]
pub fn NavigationBridge() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(path) = auth.pending_navigation.get() {
            auth.pending_navigation.set(None);
            navigate(&path, NavigateOptions::default());
        }
    });
}

/// A store-requested navigation outranks guard redirects, otherwise logout
/// from a protected page would race `/login` against `/`.
pub(crate) fn gate(pending: Option<&str>, decision: GuardDecision) -> GuardDecision {
    if pending.is_some() && decision.redirect_target().is_some() {
        GuardDecision::Loading
    } else {
        decision
    }
}

fn render_decision(decision: Memo<GuardDecision>, children: ChildrenFn) -> impl IntoView {
    move || match decision.get() {
        GuardDecision::Loading => view! { <div class="guard-loading">"Loading..."</div> }.into_any(),
        GuardDecision::Redirect(path) => view! { <Redirect path=path/> }.into_any(),
        GuardDecision::Render => children().into_any(),
    }
}
