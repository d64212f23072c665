//! Auth context shared by guards, layouts and pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns exactly one `ClientStore` and publishes it through
//! `AuthContext`. Store events are mirrored into signals: `Changed` into
//! `session`, `Notice` into the toast stack and `Navigate` into
//! `pending_navigation`, which `NavigationBridge` consumes inside the router.
//!
//! DESIGN
//! ======
//! The store is `!Send` (`Rc`/`RefCell`), so it sits in a local-storage
//! `StoredValue` and the context itself stays `Copy`. The store's
//! `Lifetime` ends in `on_cleanup`, after which late network results are
//! discarded instead of writing into disposed signals.

use std::rc::Rc;

use eyeclinic::session::Notice;
use eyeclinic::{Session, SessionEvent, SessionStore};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::net::api::BrowserApi;
use crate::state::toast::{self, ToastState};
use crate::util::storage::BrowserStorage;

pub type ClientStore = SessionStore<BrowserApi, BrowserStorage>;

#[derive(Clone, Copy)]
pub struct AuthContext {
    /// Mirror of the store's session; starts pending until restore resolves.
    pub session: RwSignal<Session>,
    /// Route requested by the store, not yet applied by the router.
    pub pending_navigation: RwSignal<Option<String>>,
    store: StoredValue<Rc<ClientStore>, LocalStorage>,
}

impl AuthContext {
    /// Wire `store` to fresh signals, provide the context and start restore.
    pub fn install(store: ClientStore, toasts: RwSignal<ToastState>) -> Self {
        let store = Rc::new(store);
        let session = RwSignal::new(store.session());
        let pending_navigation = RwSignal::new(None::<String>);

        store.subscribe(move |event| match event {
            SessionEvent::Changed(next) => session.set(next.clone()),
            SessionEvent::Notice(notice) => push_notice(toasts, notice.clone()),
            SessionEvent::Navigate(path) => pending_navigation.set(Some(path.clone())),
        });

        let ctx = Self {
            session,
            pending_navigation,
            store: StoredValue::new_local(Rc::clone(&store)),
        };
        provide_context(ctx);

        let lifetime = store.lifetime().clone();
        on_cleanup(move || lifetime.end());

        spawn_local(async move {
            let restored = store.restore().await;
            tracing::debug!(authenticated = restored.is_authenticated(), "startup session resolved");
        });
        ctx
    }

    /// The store, unless the owning root has been disposed.
    pub fn store(&self) -> Option<Rc<ClientStore>> {
        self.store.try_get_value()
    }

    /// Log out in the background; navigation follows the store's event.
    pub fn logout(&self) {
        let Some(store) = self.store() else {
            return;
        };
        spawn_local(async move {
            store.logout().await;
        });
    }
}

/// Auth context provided by `App`.
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

fn push_notice(toasts: RwSignal<ToastState>, notice: Notice) {
    if let Some(id) = toasts.try_update(|t| t.push(notice)) {
        toast::schedule_dismiss(toasts, id);
    }
}
