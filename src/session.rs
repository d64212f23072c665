//! Session store: the single owner of "who is logged in".
//!
//! SYSTEM CONTEXT
//! ==============
//! Created once by the application root and passed down explicitly (the
//! Leptos client provides it through context, the CLI owns it in `main`).
//! Route guards read `Session` snapshots; pages subscribe to events.
//!
//! DESIGN
//! ======
//! `Session` is replaced as a whole on every mutation and the `RefCell` is
//! never borrowed across an await, so a snapshot is always self-consistent.
//! Every network suspend point runs inside the store's `Lifetime`; once
//! `teardown` has run, late results are dropped without touching state.
//!
//! ERROR HANDLING
//! ==============
//! `login`/`register` return `ApiError` to the caller and also publish an
//! error `Notice`. `restore` and `logout` never fail: restore falls back to
//! an anonymous session and logout always clears local state.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;

use crate::api::ClinicApi;
use crate::error::ApiError;
use crate::lifetime::Lifetime;
use crate::role::Role;
use crate::routes::paths;
use crate::storage::{AUTH_TOKEN_KEY, SessionStorage, StoredSession};
use crate::types::{AuthResponse, Credentials, RegisterRequest, User};

/// Snapshot of the authentication state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
    /// `true` until the startup restore has resolved.
    pub loading: bool,
}

impl Session {
    /// Startup state: nothing known yet.
    #[must_use]
    pub fn pending() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None, loading: false }
    }

    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user), loading: false }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::pending()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-visible notification (rendered as a toast).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// Published to subscribers after each state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Changed(Session),
    Notice(Notice),
    /// The UI should navigate to this path.
    Navigate(String),
}

type Listener = Box<dyn Fn(&SessionEvent)>;

/// Owns the current `Session`, the API transport and the durable storage.
pub struct SessionStore<A, S> {
    api: A,
    storage: S,
    state: RefCell<Session>,
    listeners: RefCell<Vec<Listener>>,
    lifetime: Lifetime,
}

impl<A, S> SessionStore<A, S>
where
    A: ClinicApi,
    S: SessionStorage,
{
    /// New store in the pending state. Call [`Self::restore`] once.
    pub fn new(api: A, storage: S) -> Self {
        Self {
            api,
            storage,
            state: RefCell::new(Session::pending()),
            listeners: RefCell::new(Vec::new()),
            lifetime: Lifetime::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Bearer token for the logged-in user, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if self.state.borrow().user.is_none() {
            return None;
        }
        self.storage.get(AUTH_TOKEN_KEY).ok().flatten().filter(|t| !t.is_empty())
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Lifetime of this store; ended by [`Self::teardown`].
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// Register a listener for session events. Listeners run synchronously
    /// on the calling task, in registration order.
    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) {
        if self.lifetime.is_live() {
            self.listeners.borrow_mut().push(Box::new(listener));
        }
    }

    /// Resolve the startup session from durable storage.
    ///
    /// Never fails: an unreadable store, a refused token or a network error
    /// all end in an anonymous session with storage cleared.
    pub async fn restore(&self) -> Session {
        let stored = match StoredSession::load(&self.storage) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable");
                None
            }
        };

        let Some(stored) = stored else {
            tracing::debug!("no stored session");
            return self.replace(Session::anonymous());
        };

        let Some(result) = self.lifetime.scope(self.api.current_user(&stored.auth_token)).await else {
            return self.session();
        };

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, role = %user.role, "session restored");
                let refreshed = StoredSession { auth_token: stored.auth_token, user: user.clone() };
                if let Err(e) = refreshed.save(&self.storage) {
                    tracing::warn!(error = %e, "failed to refresh stored user");
                }
                self.replace(Session::authenticated(user))
            }
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::info!("stored token expired or revoked; logging out");
                } else {
                    tracing::warn!(error = %e, "session check failed; logging out");
                }
                self.clear_storage();
                self.replace(Session::anonymous())
            }
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the API failure, [`ApiError::MissingToken`] for a success body
    /// without a token, or [`ApiError::Cancelled`] after teardown. The session
    /// is unchanged on every error path.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        tracing::info!(email = %credentials.email, "login attempt");
        let result = self
            .lifetime
            .scope(self.api.login(credentials))
            .await
            .ok_or(ApiError::Cancelled)?;
        self.complete_auth(result, "Login successful")
    }

    /// Register a new account and log it in.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::login`].
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        tracing::info!(email = %request.email, "registration attempt");
        let result = self
            .lifetime
            .scope(self.api.register(request))
            .await
            .ok_or(ApiError::Cancelled)?;
        self.complete_auth(result, "Registration successful")
    }

    /// Log out and return the route to navigate to.
    ///
    /// The API call is best effort. Local state and storage are cleared
    /// regardless; storage is cleared even after teardown so a revoked token
    /// is never restored on the next start.
    pub async fn logout(&self) -> &'static str {
        let token = match self.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable during logout");
                None
            }
        };

        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
            }
        }

        self.clear_storage();
        let was_authenticated = self.state.borrow().user.is_some();
        self.replace(Session::anonymous());
        if was_authenticated {
            self.emit(&SessionEvent::Notice(Notice::info("You have been logged out.")));
        }
        self.emit(&SessionEvent::Navigate(paths::LANDING.to_owned()));
        paths::LANDING
    }

    /// End the store's lifetime: pending results are discarded and
    /// listeners are released.
    pub fn teardown(&self) {
        self.lifetime.end();
        if let Ok(mut listeners) = self.listeners.try_borrow_mut() {
            listeners.clear();
        }
    }

    fn complete_auth(&self, result: Result<AuthResponse, ApiError>, greeting: &str) -> Result<User, ApiError> {
        let outcome = result.and_then(|resp| match (resp.token.filter(|t| !t.is_empty()), resp.user) {
            (Some(token), Some(user)) => Ok((token, user)),
            (None, _) => Err(ApiError::MissingToken),
            (Some(_), None) => Err(ApiError::Decode("authentication response did not include a user".to_owned())),
        });

        match outcome {
            Ok((auth_token, user)) => {
                tracing::info!(user_id = %user.id, role = %user.role, "authenticated");
                let stored = StoredSession { auth_token, user: user.clone() };
                if let Err(e) = stored.save(&self.storage) {
                    tracing::warn!(error = %e, "failed to persist session; it will not survive a restart");
                }
                self.replace(Session::authenticated(user.clone()));
                self.emit(&SessionEvent::Notice(Notice::success(greeting)));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "authentication failed");
                self.emit(&SessionEvent::Notice(Notice::error(e.user_message())));
                Err(e)
            }
        }
    }

    fn clear_storage(&self) {
        if let Err(e) = StoredSession::clear(&self.storage) {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
    }

    /// Swap in `next` and publish it. No-op after teardown.
    fn replace(&self, next: Session) -> Session {
        if !self.lifetime.is_live() {
            return self.session();
        }
        *self.state.borrow_mut() = next.clone();
        self.emit(&SessionEvent::Changed(next.clone()));
        next
    }

    fn emit(&self, event: &SessionEvent) {
        if !self.lifetime.is_live() {
            return;
        }
        // Listeners are taken out for the call so one may subscribe or read
        // the store without a re-entrant borrow.
        let current = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in &current {
            listener(event);
        }
        let mut listeners = self.listeners.borrow_mut();
        if self.lifetime.is_live() {
            let added = std::mem::replace(&mut *listeners, current);
            listeners.extend(added);
        }
    }
}
