//! Declarative route table: path → (guard, layout, page title).
//!
//! ARCHITECTURE
//! ============
//! One subtree per role plus public and guest-only routes. The Leptos
//! router in `client/` declares the same paths; this table is what the CLI
//! and the tests reason about, and what both sides take role sets from.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::guard::{GuardDecision, guest_only, require_auth};
use crate::role::Role;
use crate::session::Session;

/// Fixed paths the guards and the session store navigate to.
pub mod paths {
    pub const LANDING: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const UNAUTHORIZED: &str = "/unauthorized";
}

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
pub const CLIENT_ONLY: &[Role] = &[Role::Client];

/// Which guard wraps a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Public,
    GuestOnly,
    /// Logged-in users, optionally restricted to a role set.
    Authenticated(Option<&'static [Role]>),
}

impl Access {
    #[must_use]
    pub fn decide(self, session: &Session) -> GuardDecision {
        match self {
            Self::Public => GuardDecision::Render,
            Self::GuestOnly => guest_only(session),
            Self::Authenticated(roles) => require_auth(session, roles),
        }
    }
}

/// Chrome a page is rendered inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Public,
    Admin,
    Doctor,
    Client,
    /// Shared account pages; rendered in the current user's role layout.
    Account,
}

impl Layout {
    /// Concrete layout for `role` (resolves `Account`).
    #[must_use]
    pub fn for_role(self, role: Option<Role>) -> Self {
        match (self, role) {
            (Self::Account, Some(Role::Admin)) => Self::Admin,
            (Self::Account, Some(Role::Doctor)) => Self::Doctor,
            (Self::Account, Some(Role::Client)) => Self::Client,
            (Self::Account, None) => Self::Public,
            (other, _) => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteSpec {
    /// Pattern; `:name` segments capture one path segment.
    pub path: &'static str,
    pub access: Access,
    pub layout: Layout,
    pub title: &'static str,
}

impl RouteSpec {
    /// Bare portal root (`/admin`, `/doctor`, `/client`). It is guarded like
    /// the rest of its portal and forwards to the role's dashboard.
    #[must_use]
    pub fn is_section_root(&self) -> bool {
        matches!(self.layout, Layout::Admin | Layout::Doctor | Layout::Client) && self.path.rfind('/') == Some(0)
    }
}

const fn route(path: &'static str, access: Access, layout: Layout, title: &'static str) -> RouteSpec {
    RouteSpec { path, access, layout, title }
}

const ADMIN: Access = Access::Authenticated(Some(ADMIN_ONLY));
const DOCTOR: Access = Access::Authenticated(Some(DOCTOR_ONLY));
const CLIENT: Access = Access::Authenticated(Some(CLIENT_ONLY));
const ANY_USER: Access = Access::Authenticated(None);

/// Every route the portal serves, in match order.
pub static ROUTES: &[RouteSpec] = &[
    route(paths::LANDING, Access::Public, Layout::Public, "Eye Clinic"),
    route(paths::UNAUTHORIZED, Access::Public, Layout::Public, "Unauthorized"),
    route("/shop", Access::Public, Layout::Public, "Shop"),
    route("/shop/:id", Access::Public, Layout::Public, "Product"),
    route(paths::LOGIN, Access::GuestOnly, Layout::Public, "Login"),
    route(paths::REGISTER, Access::GuestOnly, Layout::Public, "Register"),
    route("/admin", ADMIN, Layout::Admin, "Admin Portal"),
    route("/admin/dashboard", ADMIN, Layout::Admin, "Admin Dashboard"),
    route("/admin/users", ADMIN, Layout::Admin, "Users"),
    route("/admin/products", ADMIN, Layout::Admin, "Products"),
    route("/admin/orders", ADMIN, Layout::Admin, "Orders"),
    route("/admin/appointments", ADMIN, Layout::Admin, "Appointments"),
    route("/admin/reports", ADMIN, Layout::Admin, "Reports"),
    route("/doctor", DOCTOR, Layout::Doctor, "Doctor Portal"),
    route("/doctor/dashboard", DOCTOR, Layout::Doctor, "Doctor Dashboard"),
    route("/doctor/appointments", DOCTOR, Layout::Doctor, "Appointments"),
    route("/doctor/prescriptions", DOCTOR, Layout::Doctor, "Prescriptions"),
    route("/doctor/patients", DOCTOR, Layout::Doctor, "Patients"),
    route("/client", CLIENT, Layout::Client, "Client Portal"),
    route("/client/dashboard", CLIENT, Layout::Client, "My Dashboard"),
    route("/client/appointments", CLIENT, Layout::Client, "My Appointments"),
    route("/client/orders", CLIENT, Layout::Client, "My Orders"),
    route("/client/prescriptions", CLIENT, Layout::Client, "My Prescriptions"),
    route("/client/cart", CLIENT, Layout::Client, "Cart"),
    route("/profile", ANY_USER, Layout::Account, "Profile"),
    route("/notifications", ANY_USER, Layout::Account, "Notifications"),
];

/// A resolved route and its captured `:param` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub spec: &'static RouteSpec,
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str())
    }
}

/// Strip query, fragment and trailing slash; `""` becomes `/`.
#[must_use]
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { paths::LANDING } else { trimmed }
}

/// Find the route serving `path`.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = normalize(path);
    let segments: Vec<&str> = path.split('/').skip(1).collect();

    ROUTES.iter().find_map(|spec| {
        let pattern: Vec<&'static str> = spec.path.split('/').skip(1).collect();
        if spec.path == paths::LANDING {
            return (path == paths::LANDING).then(|| RouteMatch { spec, params: Vec::new() });
        }
        if pattern.len() != segments.len() {
            return None;
        }
        let mut params = Vec::new();
        for (pat, seg) in pattern.iter().copied().zip(segments.iter().copied()) {
            if let Some(name) = pat.strip_prefix(':') {
                if seg.is_empty() {
                    return None;
                }
                params.push((name, seg.to_owned()));
            } else if pat != seg {
                return None;
            }
        }
        Some(RouteMatch { spec, params })
    })
}

/// Guard decision for `path`, `None` for unknown paths.
#[must_use]
pub fn decide(path: &str, session: &Session) -> Option<GuardDecision> {
    resolve(path).map(|m| m.spec.access.decide(session))
}
