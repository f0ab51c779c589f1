use super::*;
use crate::state::auth::Identity;

fn signed_in(is_superuser: bool) -> AuthState {
    AuthState {
        identity: Some(Identity { token: "t".to_owned(), username: "ops".to_owned(), is_superuser }),
        ..AuthState::default()
    }
}

#[test]
fn loading_state_is_pending() {
    assert_eq!(evaluate(&AuthState::booting(), false), GuardDecision::Pending);
    assert_eq!(evaluate(&AuthState::booting(), true), GuardDecision::Pending);
}

#[test]
fn missing_identity_redirects_to_login() {
    let decision = evaluate(&AuthState::default(), false);
    assert_eq!(decision, GuardDecision::RedirectToLogin);
    assert_eq!(decision.redirect_path(), Some("/login"));
    assert_eq!(evaluate(&AuthState::default(), true), GuardDecision::RedirectToLogin);
}

#[test]
fn non_admin_on_admin_route_redirects_to_dashboard() {
    let decision = evaluate(&signed_in(false), true);
    assert_eq!(decision, GuardDecision::RedirectToDashboard);
    assert_eq!(decision.redirect_path(), Some("/dashboard"));
}

#[test]
fn satisfied_role_renders() {
    assert_eq!(evaluate(&signed_in(false), false), GuardDecision::Render);
    assert_eq!(evaluate(&signed_in(true), true), GuardDecision::Render);
    assert_eq!(evaluate(&signed_in(true), false).redirect_path(), None);
}
