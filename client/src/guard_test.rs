use super::*;

// =============================================================================
// is_protected
// =============================================================================

#[test]
fn dashboard_and_descendants_are_protected() {
    assert!(is_protected("/dashboard"));
    assert!(is_protected("/dashboard/"));
    assert!(is_protected("/dashboard/settings/profile"));
}

#[test]
fn lookalike_and_public_paths_are_not_protected() {
    assert!(!is_protected("/dashboards"));
    assert!(!is_protected("/"));
    assert!(!is_protected("/sign-in"));
    assert!(!is_protected("/auth/google/callback"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn protected_without_token_redirects_with_return_path() {
    assert_eq!(
        check("/dashboard", None),
        GuardDecision::Redirect(
            "/sign-in?error=Please+sign+in+to+access+this+page&redirect=%2Fdashboard".to_owned()
        )
    );
}

#[test]
fn protected_with_empty_token_redirects() {
    assert!(matches!(check("/dashboard/x", Some("")), GuardDecision::Redirect(_)));
}

#[test]
fn protected_with_token_is_allowed() {
    assert_eq!(check("/dashboard/x", Some("tok")), GuardDecision::Allow);
}

#[test]
fn unprotected_is_allowed_without_token() {
    assert_eq!(check("/sign-up", None), GuardDecision::Allow);
}

#[test]
fn sign_in_url_without_redirect() {
    assert_eq!(sign_in_url("Authentication failed", None), "/sign-in?error=Authentication+failed");
}

// =============================================================================
// redirect_target
// =============================================================================

#[test]
fn redirect_target_keeps_local_paths() {
    assert_eq!(redirect_target(Some("/dashboard/settings")), "/dashboard/settings");
}

#[test]
fn redirect_target_defaults_to_dashboard() {
    assert_eq!(redirect_target(None), DEFAULT_LANDING_PATH);
    assert_eq!(redirect_target(Some("")), DEFAULT_LANDING_PATH);
}

#[test]
fn redirect_target_rejects_off_origin_values() {
    for value in ["https://evil.example", "//evil.example", "/\\evil.example", "dashboard", "/a\nb"] {
        assert_eq!(redirect_target(Some(value)), DEFAULT_LANDING_PATH, "{value:?}");
    }
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn token_found_in_any_cookie_header() {
    let headers = ["theme=dark", "a=1; token=tok123; b=2"];
    assert_eq!(token_from_cookie_headers(headers).as_deref(), Some("tok123"));
}

#[test]
fn missing_token_cookie_is_none() {
    assert_eq!(token_from_cookie_headers(["theme=dark"]), None);
    assert_eq!(token_from_cookie_headers(["token="]), None);
}

// =============================================================================
// request_decision
// =============================================================================

fn parts(uri: &str, cookies: &[&str]) -> http::request::Parts {
    let mut builder = http::Request::builder().uri(uri);
    for cookie in cookies {
        builder = builder.header(http::header::COOKIE, *cookie);
    }
    builder.body(()).unwrap().into_parts().0
}

#[test]
fn request_with_token_cookie_is_allowed() {
    assert_eq!(request_decision(&parts("/dashboard", &["token=tok123"])), GuardDecision::Allow);
}

#[test]
fn request_without_cookie_header_redirects() {
    assert_eq!(
        request_decision(&parts("/dashboard", &[])),
        GuardDecision::Redirect(
            "/sign-in?error=Please+sign+in+to+access+this+page&redirect=%2Fdashboard".to_owned()
        )
    );
}

#[test]
fn request_token_found_across_multiple_cookie_headers() {
    let request = parts("/dashboard", &["theme=dark", "lang=en; token=tok123"]);
    assert_eq!(request_decision(&request), GuardDecision::Allow);
}

#[test]
fn request_with_other_cookies_only_redirects() {
    let request = parts("/dashboard", &["theme=dark", "token="]);
    assert!(matches!(request_decision(&request), GuardDecision::Redirect(_)));
}

#[test]
fn request_sub_path_redirect_carries_path_without_query() {
    let request = parts("/dashboard/settings?tab=profile", &[]);
    let GuardDecision::Redirect(url) = request_decision(&request) else {
        panic!("expected redirect");
    };
    assert!(url.ends_with("&redirect=%2Fdashboard%2Fsettings"), "{url}");
}

#[test]
fn request_for_public_path_is_allowed_without_cookie() {
    assert_eq!(request_decision(&parts("/sign-in?error=x", &[])), GuardDecision::Allow);
}
