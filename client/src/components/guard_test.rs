use eyeclinic::guard::{guest_only, require_auth};
use eyeclinic::{GuardDecision, Role, Session, User};

use super::*;

fn session_for(role: Role) -> Session {
    Session::authenticated(User {
        id: "1".to_owned(),
        name: "Test".to_owned(),
        email: "test@example.com".to_owned(),
        role,
        phone: None,
        address: None,
        date_of_birth: None,
        avatar_url: None,
    })
}

// =============================================================================
// gate
// =============================================================================

#[test]
fn pending_navigation_holds_back_redirects() {
    let decision = gate(Some("/"), GuardDecision::Redirect("/login".to_owned()));
    assert_eq!(decision, GuardDecision::Loading);
}

#[test]
fn pending_navigation_keeps_rendering_allowed_pages() {
    assert_eq!(gate(Some("/"), GuardDecision::Render), GuardDecision::Render);
    assert_eq!(gate(Some("/"), GuardDecision::Loading), GuardDecision::Loading);
}

#[test]
fn without_pending_navigation_decision_passes_through() {
    let redirect = GuardDecision::Redirect("/unauthorized".to_owned());
    assert_eq!(gate(None, redirect.clone()), redirect);
    assert_eq!(gate(None, GuardDecision::Render), GuardDecision::Render);
}

#[test]
fn logout_from_admin_page_waits_for_landing_navigation() {
    let after_logout = require_auth(&Session::anonymous(), Some(&[Role::Admin]));
    assert_eq!(after_logout.redirect_target(), Some("/login"));
    assert_eq!(gate(Some("/"), after_logout), GuardDecision::Loading);
}

#[test]
fn login_from_guest_page_waits_for_requested_navigation() {
    let after_login = guest_only(&session_for(Role::Doctor));
    assert!(after_login.redirect_target().is_some());
    assert_eq!(gate(Some("/doctor/dashboard"), after_login), GuardDecision::Loading);
}
