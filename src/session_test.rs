use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::*;
use crate::guard::{GuardDecision, guest_only, require_auth};
use crate::storage::{MemoryStorage, USER_KEY};

// =============================================================
// Fakes
// =============================================================

fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_owned(),
        name: format!("User {id}"),
        email: format!("{id}@eyeclinic.com"),
        role,
        phone: None,
        address: None,
        date_of_birth: None,
        avatar_url: None,
    }
}

fn ok_auth(token: &str, user: User) -> Result<AuthResponse, ApiError> {
    Ok(AuthResponse { token: Some(token.to_owned()), user: Some(user) })
}

/// Scriptable API: canned login/register responses, a token → user table
/// for `current_user`, and a call log.
struct FakeApi {
    login: RefCell<Result<AuthResponse, ApiError>>,
    register: RefCell<Result<AuthResponse, ApiError>>,
    sessions: RefCell<HashMap<String, User>>,
    logout_fails: Cell<bool>,
    current_user_error: RefCell<Option<ApiError>>,
    end_during_call: RefCell<Option<Lifetime>>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            login: RefCell::new(Err(ApiError::Unavailable)),
            register: RefCell::new(Err(ApiError::Unavailable)),
            sessions: RefCell::new(HashMap::new()),
            logout_fails: Cell::new(false),
            current_user_error: RefCell::new(None),
            end_during_call: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        })
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
        if let Some(lifetime) = self.end_during_call.borrow().as_ref() {
            lifetime.end();
        }
    }

    /// Login response that also registers the token for later restores.
    fn accept_login(&self, token: &str, user: User) {
        self.sessions.borrow_mut().insert(token.to_owned(), user.clone());
        *self.login.borrow_mut() = ok_auth(token, user);
    }
}

#[async_trait(?Send)]
impl ClinicApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record(format!("login:{}", credentials.email));
        self.login.borrow().clone()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.record(format!("register:{}", request.email));
        self.register.borrow().clone()
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.record(format!("logout:{token}"));
        self.sessions.borrow_mut().remove(token);
        if self.logout_fails.get() {
            return Err(ApiError::Transport("connection reset".to_owned()));
        }
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<User, ApiError> {
        self.record(format!("me:{token}"));
        if let Some(err) = self.current_user_error.borrow().clone() {
            return Err(err);
        }
        self.sessions
            .borrow()
            .get(token)
            .cloned()
            .ok_or(ApiError::Rejected { status: 401, message: "Unauthenticated.".to_owned() })
    }

    async fn get_json(&self, path: &str, _: Option<&str>) -> Result<serde_json::Value, ApiError> {
        self.record(format!("get:{path}"));
        Ok(serde_json::json!({ "data": [] }))
    }
}

type Store = SessionStore<Rc<FakeApi>, MemoryStorage>;

fn store() -> (Store, Rc<FakeApi>, MemoryStorage) {
    let api = FakeApi::new();
    let storage = MemoryStorage::new();
    (SessionStore::new(api.clone(), storage.clone()), api, storage)
}

fn record_events(store: &Store) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

fn admin_credentials() -> Credentials {
    Credentials::new("admin@eyeclinic.com", "password")
}

// =============================================================
// Session
// =============================================================

#[test]
fn new_store_is_pending() {
    let (store, _, _) = store();
    assert_eq!(store.session(), Session { user: None, loading: true });
    assert!(store.token().is_none());
}

#[test]
fn session_helpers() {
    let s = Session::authenticated(user("1", Role::Doctor));
    assert!(s.is_authenticated());
    assert_eq!(s.role(), Some(Role::Doctor));
    assert!(!Session::pending().is_authenticated());
    assert_eq!(Session::default(), Session::pending());
}

// =============================================================
// restore
// =============================================================

#[tokio::test]
async fn restore_without_token_resolves_anonymous() {
    let (store, api, _) = store();
    let events = record_events(&store);

    let session = store.restore().await;

    assert_eq!(session, Session::anonymous());
    assert!(api.calls.borrow().is_empty());
    assert_eq!(events.borrow().as_slice(), &[SessionEvent::Changed(Session::anonymous())]);
    assert_eq!(
        require_auth(&session, Some(crate::routes::ADMIN_ONLY)),
        GuardDecision::Redirect("/login".to_owned())
    );
}

#[tokio::test]
async fn restore_with_valid_token_sets_user() {
    let (store, api, storage) = store();
    let doctor = user("7", Role::Doctor);
    api.sessions.borrow_mut().insert("t7".to_owned(), doctor.clone());
    StoredSession { auth_token: "t7".to_owned(), user: doctor.clone() }.save(&storage).unwrap();

    let session = store.restore().await;

    assert_eq!(session.user, Some(doctor));
    assert!(!session.loading);
    assert_eq!(store.token().as_deref(), Some("t7"));
    assert_eq!(api.calls.borrow().as_slice(), &["me:t7".to_owned()]);
}

#[tokio::test]
async fn restore_refreshes_stored_user_record() {
    let (store, api, storage) = store();
    let stale = user("7", Role::Client);
    let mut fresh = stale.clone();
    fresh.name = "Renamed".to_owned();
    api.sessions.borrow_mut().insert("t7".to_owned(), fresh.clone());
    StoredSession { auth_token: "t7".to_owned(), user: stale }.save(&storage).unwrap();

    store.restore().await;

    let stored = StoredSession::load(&storage).unwrap().unwrap();
    assert_eq!(stored.user, fresh);
}

#[tokio::test]
async fn restore_with_rejected_token_clears_storage_silently() {
    let (store, _, storage) = store();
    StoredSession { auth_token: "expired".to_owned(), user: user("1", Role::Admin) }
        .save(&storage)
        .unwrap();
    let events = record_events(&store);

    let session = store.restore().await;

    assert_eq!(session, Session::anonymous());
    assert!(storage.is_empty());
    assert!(
        !events.borrow().iter().any(|e| matches!(e, SessionEvent::Notice(_))),
        "restore failures must not notify"
    );
}

#[tokio::test]
async fn restore_with_unreachable_api_also_clears_storage() {
    let (store, api, storage) = store();
    api.sessions.borrow_mut().insert("t1".to_owned(), user("1", Role::Doctor));
    *api.current_user_error.borrow_mut() = Some(ApiError::Transport("connection refused".to_owned()));
    StoredSession { auth_token: "t1".to_owned(), user: user("1", Role::Doctor) }
        .save(&storage)
        .unwrap();

    assert_eq!(store.restore().await, Session::anonymous());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn restore_with_half_stored_session_skips_api() {
    let (store, api, storage) = store();
    storage.set(AUTH_TOKEN_KEY, "t1").unwrap();

    assert_eq!(store.restore().await, Session::anonymous());
    assert!(api.calls.borrow().is_empty());
    assert!(storage.is_empty());
}

// =============================================================
// login
// =============================================================

#[tokio::test]
async fn login_success_persists_and_sets_user() {
    let (store, api, storage) = store();
    store.restore().await;
    let admin = user("1", Role::Admin);
    api.accept_login("t1", admin.clone());
    let events = record_events(&store);

    let returned = store.login(&admin_credentials()).await.unwrap();

    assert_eq!(returned, admin);
    assert_eq!(store.session(), Session::authenticated(admin.clone()));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t1"));
    assert!(storage.get(USER_KEY).unwrap().unwrap().contains("\"admin\""));
    assert_eq!(
        events.borrow().as_slice(),
        &[
            SessionEvent::Changed(Session::authenticated(admin)),
            SessionEvent::Notice(Notice::success("Login successful")),
        ]
    );
    assert_eq!(
        guest_only(&store.session()),
        GuardDecision::Redirect("/admin/dashboard".to_owned())
    );
}

#[tokio::test]
async fn login_validation_error_leaves_store_unchanged() {
    let (store, api, storage) = store();
    store.restore().await;
    *api.login.borrow_mut() = Err(ApiError::from_response(422, r#"{"errors": {"email": ["invalid"]}}"#));
    let events = record_events(&store);

    let err = store.login(&admin_credentials()).await.unwrap_err();

    assert_eq!(err.field_error("email"), Some("invalid"));
    assert_eq!(store.session(), Session::anonymous());
    assert!(storage.is_empty());
    assert_eq!(
        events.borrow().as_slice(),
        &[SessionEvent::Notice(Notice::error("invalid"))]
    );
}

#[tokio::test]
async fn login_success_without_token_is_an_error() {
    let (store, api, storage) = store();
    store.restore().await;
    *api.login.borrow_mut() = Ok(AuthResponse { token: None, user: Some(user("1", Role::Admin)) });

    let err = store.login(&admin_credentials()).await.unwrap_err();

    assert_eq!(err, ApiError::MissingToken);
    assert!(store.user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn login_with_empty_token_is_an_error() {
    let (store, api, _) = store();
    store.restore().await;
    *api.login.borrow_mut() = ok_auth("", user("1", Role::Admin));

    assert_eq!(store.login(&admin_credentials()).await.unwrap_err(), ApiError::MissingToken);
}

#[tokio::test]
async fn login_token_without_user_is_decode_error() {
    let (store, api, _) = store();
    store.restore().await;
    *api.login.borrow_mut() = Ok(AuthResponse { token: Some("t1".to_owned()), user: None });

    assert!(matches!(store.login(&admin_credentials()).await, Err(ApiError::Decode(_))));
    assert!(store.user().is_none());
}

#[tokio::test]
async fn login_failure_keeps_previous_user() {
    let (store, api, _) = store();
    store.restore().await;
    let admin = user("1", Role::Admin);
    api.accept_login("t1", admin.clone());
    store.login(&admin_credentials()).await.unwrap();

    *api.login.borrow_mut() = Err(ApiError::Transport("offline".to_owned()));
    assert!(store.login(&admin_credentials()).await.is_err());
    assert_eq!(store.user(), Some(admin));
}

#[tokio::test]
async fn login_then_restart_restores_same_role() {
    let (store, api, storage) = store();
    store.restore().await;
    api.accept_login("t1", user("1", Role::Admin));
    store.login(&admin_credentials()).await.unwrap();
    drop(store);

    let restarted: Store = SessionStore::new(api.clone(), storage.clone());
    let session = restarted.restore().await;

    assert_eq!(session.role(), Some(Role::Admin));
}

// =============================================================
// register
// =============================================================

#[tokio::test]
async fn register_success_logs_in() {
    let (store, api, storage) = store();
    store.restore().await;
    let client = user("9", Role::Client);
    *api.register.borrow_mut() = ok_auth("t9", client.clone());
    let request = RegisterRequest {
        name: "New Client".to_owned(),
        email: "new@x.io".to_owned(),
        password: "secret123".to_owned(),
        password_confirmation: "secret123".to_owned(),
        phone: None,
    };

    let returned = store.register(&request).await.unwrap();

    assert_eq!(returned.role, Role::Client);
    assert_eq!(store.user(), Some(client));
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("t9"));
}

#[tokio::test]
async fn register_validation_error_surfaces_fields() {
    let (store, api, _) = store();
    store.restore().await;
    *api.register.borrow_mut() = Err(ApiError::from_response(
        422,
        r#"{"message": "The email has already been taken.", "errors": {"email": ["The email has already been taken."]}}"#,
    ));
    let request = RegisterRequest {
        name: "Dup".to_owned(),
        email: "dup@x.io".to_owned(),
        password: "pw".to_owned(),
        password_confirmation: "pw".to_owned(),
        phone: None,
    };

    let err = store.register(&request).await.unwrap_err();

    assert_eq!(err.field_error("email"), Some("The email has already been taken."));
    assert!(store.user().is_none());
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_clears_everything_and_navigates_to_landing() {
    let (store, api, storage) = store();
    store.restore().await;
    api.accept_login("t1", user("1", Role::Admin));
    store.login(&admin_credentials()).await.unwrap();
    let events = record_events(&store);

    let target = store.logout().await;

    assert_eq!(target, "/");
    assert_eq!(store.session(), Session::anonymous());
    assert!(storage.is_empty());
    assert!(api.calls.borrow().contains(&"logout:t1".to_owned()));
    assert_eq!(events.borrow().last(), Some(&SessionEvent::Navigate("/".to_owned())));
}

#[tokio::test]
async fn logout_network_failure_still_clears() {
    let (store, api, storage) = store();
    store.restore().await;
    api.accept_login("t1", user("1", Role::Client));
    store.login(&admin_credentials()).await.unwrap();
    api.logout_fails.set(true);

    store.logout().await;

    assert!(store.user().is_none());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn logout_when_logged_out_is_idempotent() {
    let (store, api, storage) = store();
    store.restore().await;
    let events = record_events(&store);

    store.logout().await;
    store.logout().await;

    assert_eq!(store.session(), Session::anonymous());
    assert!(storage.is_empty());
    assert!(api.calls.borrow().is_empty(), "no token, no logout call");
    assert!(!events.borrow().iter().any(|e| matches!(e, SessionEvent::Notice(_))));
}

// =============================================================
// teardown
// =============================================================

#[tokio::test]
async fn teardown_during_login_discards_result() {
    let (store, api, storage) = store();
    store.restore().await;
    api.accept_login("t1", user("1", Role::Admin));
    *api.end_during_call.borrow_mut() = Some(store.lifetime().clone());
    let events = record_events(&store);

    let err = store.login(&admin_credentials()).await.unwrap_err();

    assert_eq!(err, ApiError::Cancelled);
    assert_eq!(store.session(), Session::anonymous());
    assert!(storage.is_empty());
    assert!(events.borrow().is_empty());
}

#[tokio::test]
async fn teardown_during_restore_keeps_pending_state() {
    let (store, api, storage) = store();
    let admin = user("1", Role::Admin);
    api.sessions.borrow_mut().insert("t1".to_owned(), admin.clone());
    StoredSession { auth_token: "t1".to_owned(), user: admin }.save(&storage).unwrap();
    *api.end_during_call.borrow_mut() = Some(store.lifetime().clone());

    let session = store.restore().await;

    assert_eq!(session, Session::pending());
    assert_eq!(storage.len(), 2, "teardown must not wipe a valid session");
}

#[tokio::test]
async fn teardown_releases_listeners() {
    let (store, _, _) = store();
    let events = record_events(&store);
    store.teardown();
    store.restore().await;
    store.subscribe(|_| panic!("subscribed after teardown"));
    store.logout().await;
    assert!(events.borrow().is_empty());
}

// =============================================================
// Listeners
// =============================================================

#[tokio::test]
async fn listener_may_read_store_during_event() {
    let (store, _, _) = store();
    let store = Rc::new(store);
    let seen = Rc::new(Cell::new(false));
    let weak = Rc::downgrade(&store);
    let flag = seen.clone();
    store.subscribe(move |event| {
        if let (SessionEvent::Changed(s), Some(store)) = (event, weak.upgrade()) {
            flag.set(store.session() == *s);
        }
    });

    store.restore().await;

    assert!(seen.get());
}
