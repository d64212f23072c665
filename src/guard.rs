//! Route guards as pure decisions over a `Session` snapshot.
//!
//! The routing layer interprets the result: render a placeholder, navigate,
//! or render the guarded subtree. Nothing here performs navigation itself.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::role::Role;
use crate::routes::paths;
use crate::session::Session;

/// What a guarded route should do for the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a loading placeholder.
    Loading,
    /// Navigate to this path instead.
    Redirect(String),
    /// Render the guarded children.
    Render,
}

impl GuardDecision {
    #[must_use]
    pub fn renders(&self) -> bool {
        matches!(self, Self::Render)
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect(path) => Some(path),
            _ => None,
        }
    }
}

/// Admit authenticated users whose role is in `allowed` (any role when
/// `allowed` is `None`).
#[must_use]
pub fn require_auth(session: &Session, allowed: Option<&[Role]>) -> GuardDecision {
    if session.loading {
        return GuardDecision::Loading;
    }
    let Some(user) = &session.user else {
        return GuardDecision::Redirect(paths::LOGIN.to_owned());
    };
    match allowed {
        Some(roles) if !roles.contains(&user.role) => GuardDecision::Redirect(paths::UNAUTHORIZED.to_owned()),
        _ => GuardDecision::Render,
    }
}

/// Admit only visitors without a session; logged-in users go to their home.
#[must_use]
pub fn guest_only(session: &Session) -> GuardDecision {
    if session.loading {
        return GuardDecision::Loading;
    }
    match &session.user {
        Some(user) => GuardDecision::Redirect(user.role.home_route().to_owned()),
        None => GuardDecision::Render,
    }
}
