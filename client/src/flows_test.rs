use super::*;
use crate::storage::{CredentialTier, PAGE_TOKEN_KEY, TOKEN_COOKIE};
use crate::test_helpers::test_gateway;
use crate::util::validation::{Field, INVALID_EMAIL, PASSWORDS_DIFFER};
use futures::executor::block_on;
use serde_json::json;

fn sign_in_input(email: &str, password: &str) -> SignInInput {
    SignInInput { email: email.to_owned(), password: password.to_owned(), ..Default::default() }
}

// =============================================================================
// sign-in
// =============================================================================

#[test]
fn sign_in_stores_credential_in_both_tiers_and_lands_on_dashboard() {
    let g = test_gateway();
    let user = json!({"id": "u1", "email": "a@b.com"});
    g.transport.respond(200, &json!({"access_token": "tok123", "user": user.clone()}));

    let target = block_on(sign_in(&g.gateway, &sign_in_input("a@b.com", "password1"), None)).unwrap();

    assert_eq!(target, "/dashboard");
    assert_eq!(g.t.edge.read(TOKEN_COOKIE).as_deref(), Some("tok123"));
    assert_eq!(g.t.page.read(PAGE_TOKEN_KEY).as_deref(), Some("tok123"));
    assert_eq!(g.t.session.page_user(), Some(user));
}

#[test]
fn sign_in_returns_to_requested_page() {
    let g = test_gateway();
    g.transport.respond(200, &json!({"access_token": "tok"}));

    let target = block_on(sign_in(
        &g.gateway,
        &sign_in_input("a@b.com", "password1"),
        Some("/dashboard/settings"),
    ))
    .unwrap();

    assert_eq!(target, "/dashboard/settings");
}

#[test]
fn sign_in_ignores_off_site_redirect() {
    let g = test_gateway();
    g.transport.respond(200, &json!({"access_token": "tok"}));

    let target = block_on(sign_in(
        &g.gateway,
        &sign_in_input("a@b.com", "password1"),
        Some("https://evil.example"),
    ))
    .unwrap();

    assert_eq!(target, "/dashboard");
}

#[test]
fn invalid_sign_in_never_calls_api() {
    let g = test_gateway();

    let err = block_on(sign_in(&g.gateway, &sign_in_input("bad", "password1"), None)).unwrap_err();

    let FlowError::Validation(errors) = &err else { panic!("expected validation error, got {err:?}") };
    assert_eq!(errors.message_for(Field::Email), Some(INVALID_EMAIL));
    assert!(g.transport.requests().is_empty());
}

#[test]
fn rejected_sign_in_shows_detail_and_stores_nothing() {
    let g = test_gateway();
    g.transport.respond(401, &json!({"detail": "Incorrect email or password"}));

    let err = block_on(sign_in(&g.gateway, &sign_in_input("a@b.com", "password1"), None)).unwrap_err();

    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(!g.t.session.is_authenticated());
    assert!(g.navigator.hrefs().is_empty());
}

#[test]
fn sign_in_without_profile_does_not_keep_previous_users_profile() {
    let g = test_gateway();
    g.transport
        .respond(200, &json!({"access_token": "tokA", "user": {"id": "alice"}}))
        .respond(200, &json!({"access_token": "tokB"}));

    block_on(sign_in(&g.gateway, &sign_in_input("alice@b.com", "password1"), None)).unwrap();
    block_on(sign_in(&g.gateway, &sign_in_input("bob@b.com", "password1"), None)).unwrap();

    assert_eq!(g.t.session.credential().as_deref(), Some("tokB"));
    assert_eq!(g.t.session.page_user(), None);
}

// =============================================================================
// sign-up
// =============================================================================

#[test]
fn sign_up_stores_credential() {
    let g = test_gateway();
    g.transport.respond(200, &json!({"access_token": "new", "user": {"id": "u2"}}));
    let input = SignUpInput {
        name: "Ada".to_owned(),
        email: "ada@b.com".to_owned(),
        password: "Password1".to_owned(),
        confirm_password: "Password1".to_owned(),
        accept_terms: true,
    };

    assert_eq!(block_on(sign_up(&g.gateway, &input)).unwrap(), "/dashboard");
    assert_eq!(g.t.session.credential().as_deref(), Some("new"));
}

#[test]
fn sign_up_mismatch_is_validation_error() {
    let g = test_gateway();
    let input = SignUpInput {
        name: "Ada".to_owned(),
        email: "ada@b.com".to_owned(),
        password: "Password1".to_owned(),
        confirm_password: "Password2".to_owned(),
        accept_terms: true,
    };

    let err = block_on(sign_up(&g.gateway, &input)).unwrap_err();

    assert_eq!(err.user_message(), PASSWORDS_DIFFER);
    assert!(g.transport.requests().is_empty());
}

// =============================================================================
// oauth
// =============================================================================

#[test]
fn begin_oauth_returns_provider_url() {
    let g = test_gateway();
    g.transport.respond(200, &json!({"authorization_url": "https://accounts.example/o"}));

    let url = block_on(begin_oauth(&g.gateway, OAuthProvider::Google)).unwrap();

    assert_eq!(url, "https://accounts.example/o");
}

#[test]
fn google_callback_without_code_fails_without_request() {
    let g = test_gateway();

    assert_eq!(block_on(complete_google_callback(&g.gateway, None)), Err(FlowError::MissingCode));
    assert_eq!(block_on(complete_google_callback(&g.gateway, Some(" "))), Err(FlowError::MissingCode));
    assert!(g.transport.requests().is_empty());
}

#[test]
fn google_callback_stores_credential() {
    let g = test_gateway();
    g.transport.respond(200, &json!({"access_token": "g-tok", "user": {"id": "u3"}}));

    let target = block_on(complete_google_callback(&g.gateway, Some("abc"))).unwrap();

    assert_eq!(target, "/dashboard");
    assert_eq!(g.t.session.credential().as_deref(), Some("g-tok"));
}

#[test]
fn google_callback_failure_leaves_session_empty() {
    let g = test_gateway();
    g.transport.respond_raw(400, "invalid_grant");

    let err = block_on(complete_google_callback(&g.gateway, Some("abc"))).unwrap_err();

    assert!(matches!(err, FlowError::Api(ApiError::Status { status: 400, .. })));
    assert!(!g.t.session.is_authenticated());
}

#[test]
fn callback_failure_url_carries_message() {
    assert_eq!(callback_failure_url(), "/sign-in?error=Authentication+failed");
}

// =============================================================================
// code request, profile, sign-out
// =============================================================================

#[test]
fn request_code_validates_before_calling() {
    let g = test_gateway();

    assert!(matches!(block_on(request_code(&g.gateway, "nope")), Err(FlowError::Validation(_))));
    assert!(g.transport.requests().is_empty());

    g.transport.respond(200, &json!({"code_sent": true}));
    let resp = block_on(request_code(&g.gateway, "a@b.com")).unwrap();
    assert!(resp.code_sent);
}

#[test]
fn load_profile_maps_rejection_to_session_expired() {
    let g = test_gateway();
    g.t.session.set_credential("old", None);
    g.transport.respond_raw(401, "");

    assert_eq!(block_on(load_profile(&g.gateway)), Err(FlowError::SessionExpired));
    assert!(!g.t.session.is_authenticated());
}

#[test]
fn profile_server_error_produces_inline_message() {
    let g = test_gateway();
    g.t.session.set_credential("tok", None);
    g.transport.respond(500, &json!({"detail": "database unavailable"}));

    let err = block_on(load_profile(&g.gateway)).unwrap_err();

    assert_eq!(
        profile_failure_message(&err).as_deref(),
        Some("Failed to load profile: database unavailable")
    );
    assert!(g.t.session.is_authenticated());
}

#[test]
fn profile_network_error_produces_inline_message() {
    let g = test_gateway();
    g.t.session.set_credential("tok", None);
    g.transport.fail("offline");

    let err = block_on(load_profile(&g.gateway)).unwrap_err();

    assert_eq!(
        profile_failure_message(&err).as_deref(),
        Some("Failed to load profile: network error: offline")
    );
}

#[test]
fn expired_session_has_no_inline_profile_message() {
    assert_eq!(profile_failure_message(&FlowError::SessionExpired), None);
}

#[test]
fn sign_out_clears_and_navigates() {
    let g = test_gateway();
    g.t.session.set_credential("tok", Some(&json!({"id": "u1"})));

    sign_out(&g.gateway);

    assert!(!g.t.session.is_authenticated());
    assert_eq!(g.t.session.page_user(), None);
    assert_eq!(g.navigator.hrefs(), vec!["/sign-in".to_owned()]);
}
