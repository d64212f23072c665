//! Portal chrome: header navigation, session controls and content area.
//!
//! Navigation is client-side only; the API enforces access on every
//! request regardless of what this header shows.

use eyeclinic::routes::{Layout, paths};
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::use_auth;
use crate::util::nav::{NavLink, nav_links};

/// Wraps a page in the header for `layout`. `Layout::Account` pages take
/// the current user's portal header.
#[component]
pub fn PortalLayout(layout: Layout, children: Children) -> impl IntoView {
    let auth = use_auth();
    let resolved = Memo::new(move |_| layout.for_role(auth.session.get().role()));
    let is_authenticated = move || auth.session.get().is_authenticated();
    let user_name = move || auth.session.get().user.map(|u| u.name).unwrap_or_default();
    let portal_class = move || match resolved.get() {
        Layout::Admin => "portal portal--admin",
        Layout::Doctor => "portal portal--doctor",
        Layout::Client => "portal portal--client",
        Layout::Public | Layout::Account => "portal portal--public",
    };

    view! {
        <div class=portal_class>
            <header class="portal__header">
                <span class="portal__brand">
                    <A href=paths::LANDING>"Eye Clinic"</A>
                </span>
                <nav class="portal__nav">
                    <For
                        each=move || nav_links(resolved.get())
                        key=|link| link.href
                        children=|link: NavLink| view! { <A href=link.href>{link.label}</A> }
                    />
                </nav>
                <div class="portal__session">
                    <Show
                        when=is_authenticated
                        fallback=|| {
                            view! {
                                <A href=paths::LOGIN>"Sign In"</A>
                                <A href=paths::REGISTER>"Register"</A>
                            }
                        }
                    >
                        <span class="portal__user">{user_name}</span>
                        <button type="button" class="portal__logout" on:click=move |_| auth.logout()>
                            "Sign Out"
                        </button>
                    </Show>
                </div>
            </header>
            <main class="portal__main">{children()}</main>
        </div>
    }
}
