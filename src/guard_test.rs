use super::*;
use crate::types::User;

fn user(role: Role) -> User {
    User {
        id: "1".to_owned(),
        name: "Test".to_owned(),
        email: "test@eyeclinic.com".to_owned(),
        role,
        phone: None,
        address: None,
        date_of_birth: None,
        avatar_url: None,
    }
}

/// Every subset of the three roles.
fn role_subsets() -> Vec<Vec<Role>> {
    (0u8..8)
        .map(|mask| {
            Role::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, r)| r)
                .collect()
        })
        .collect()
}

/// Every session shape: pending/resolved crossed with no user or each role.
fn sessions() -> Vec<Session> {
    let users = std::iter::once(None).chain(Role::ALL.into_iter().map(|r| Some(user(r))));
    users
        .flat_map(|u| {
            [true, false].into_iter().map(move |loading| Session { user: u.clone(), loading })
        })
        .collect()
}

// =============================================================
// require_auth
// =============================================================

#[test]
fn require_auth_renders_iff_resolved_user_with_allowed_role() {
    for session in sessions() {
        let mut allowed_sets: Vec<Option<Vec<Role>>> = role_subsets().into_iter().map(Some).collect();
        allowed_sets.push(None);
        for allowed in allowed_sets {
            let decision = require_auth(&session, allowed.as_deref());
            let expected = !session.loading
                && session.user.as_ref().is_some_and(|u| {
                    allowed.as_ref().map_or(true, |roles| roles.contains(&u.role))
                });
            assert_eq!(decision.renders(), expected, "session {session:?} allowed {allowed:?}");
        }
    }
}

#[test]
fn require_auth_waits_while_loading() {
    let session = Session { user: Some(user(Role::Admin)), loading: true };
    assert_eq!(require_auth(&session, Some(&[Role::Admin])), GuardDecision::Loading);
    assert_eq!(require_auth(&Session::pending(), None), GuardDecision::Loading);
}

#[test]
fn require_auth_anonymous_redirects_to_login() {
    assert_eq!(
        require_auth(&Session::anonymous(), Some(&[Role::Admin])),
        GuardDecision::Redirect("/login".to_owned())
    );
}

#[test]
fn require_auth_wrong_role_redirects_to_unauthorized() {
    let session = Session::authenticated(user(Role::Client));
    let decision = require_auth(&session, Some(&[Role::Admin]));
    assert_eq!(decision.redirect_target(), Some("/unauthorized"));
}

#[test]
fn require_auth_empty_role_set_admits_nobody() {
    let session = Session::authenticated(user(Role::Admin));
    assert_eq!(require_auth(&session, Some(&[])).redirect_target(), Some("/unauthorized"));
}

#[test]
fn require_auth_without_role_set_admits_any_user() {
    for role in Role::ALL {
        assert!(require_auth(&Session::authenticated(user(role)), None).renders());
    }
}

// =============================================================
// guest_only
// =============================================================

#[test]
fn guest_only_renders_iff_resolved_and_anonymous() {
    for session in sessions() {
        let expected = !session.loading && session.user.is_none();
        assert_eq!(guest_only(&session).renders(), expected, "session {session:?}");
    }
}

#[test]
fn guest_only_redirects_users_to_role_home() {
    for role in Role::ALL {
        let decision = guest_only(&Session::authenticated(user(role)));
        assert_eq!(decision, GuardDecision::Redirect(role.home_route().to_owned()));
    }
}

#[test]
fn guest_only_waits_while_loading() {
    assert_eq!(guest_only(&Session::pending()), GuardDecision::Loading);
}
