//! Cookie string helpers shared by the browser tier and the edge guard.

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

use cookie::{Cookie, SameSite};
use time::Duration;

/// Build the `document.cookie` assignment that stores `value` under `name`.
/// Without `max_age` the cookie lasts for the browser session.
#[must_use]
pub fn set_cookie_string(
    name: &str,
    value: &str,
    max_age: Option<Duration>,
    secure: bool,
) -> String {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure);
    if let Some(max_age) = max_age {
        cookie = cookie.max_age(max_age);
    }
    cookie.build().to_string()
}

/// Build the assignment that evicts `name` immediately.
///
/// The path must match the one used by [`set_cookie_string`] or the browser
/// keeps the original cookie.
#[must_use]
pub fn removal_cookie_string(name: &str) -> String {
    Cookie::build((name, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}

/// Extract a non-empty cookie value from a raw `Cookie` header (or the
/// `document.cookie` string, which uses the same syntax).
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}
