//! Route guard decision shared by the edge middleware and the render-time
//! layout check.
//!
//! SYSTEM CONTEXT
//! ==============
//! Both layers ask the same question with the same inputs (request path plus
//! the `token` cookie) and get the same answer, so a navigation that slips past
//! one layer is still caught by the other with an identical redirect.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::storage::TOKEN_COOKIE;
use crate::storage::cookie::cookie_value;

/// Path prefixes that require a credential. Matching is segment-aware:
/// `/dashboard` covers `/dashboard/settings` but not `/dashboards`.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard"];

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const SIGN_UP_PATH: &str = "/sign-up";
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "Please sign in to access this page";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Send the navigation to this sign-in URL.
    Redirect(String),
}

#[must_use]
pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Decide a navigation to `path` given the current credential, if any.
#[must_use]
pub fn check(path: &str, token: Option<&str>) -> GuardDecision {
    if !is_protected(path) || token.is_some_and(|t| !t.is_empty()) {
        return GuardDecision::Allow;
    }
    GuardDecision::Redirect(sign_in_url(SIGN_IN_REQUIRED_MESSAGE, Some(path)))
}

/// `/sign-in?error=<message>[&redirect=<path>]`, form-encoded.
#[must_use]
pub fn sign_in_url(error: &str, redirect: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("error", error);
    if let Some(redirect) = redirect {
        query.append_pair("redirect", redirect);
    }
    format!("{SIGN_IN_PATH}?{}", query.finish())
}

/// Post-login destination for a `redirect` query value. Only same-origin
/// absolute paths are honoured.
#[must_use]
pub fn redirect_target(param: Option<&str>) -> String {
    match param.map(str::trim) {
        Some(path) if is_local_path(path) => path.to_owned(),
        _ => DEFAULT_LANDING_PATH.to_owned(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control)
}

/// Credential from one or more raw `Cookie` headers.
pub fn token_from_cookie_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<String> {
    headers
        .into_iter()
        .find_map(|header| cookie_value(header, TOKEN_COOKIE))
}

/// Decision for an incoming request, from its path and every `Cookie` header.
#[cfg(any(test, feature = "ssr"))]
#[must_use]
pub fn request_decision(parts: &http::request::Parts) -> GuardDecision {
    let token = token_from_cookie_headers(
        parts
            .headers
            .get_all(http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    );
    check(parts.uri.path(), token.as_deref())
}
