//! Edge route guard.
//!
//! Runs before routing and rendering. A request for a protected path without
//! the `token` cookie is answered with a temporary redirect to sign-in that
//! carries the requested path for the return trip.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use client::guard::{self, GuardDecision};
use client::storage::TOKEN_COOKIE;

pub async fn edge_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let token = jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned());
    match guard::check(request.uri().path(), token.as_deref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(location) => {
            tracing::info!(path = %request.uri().path(), "unauthenticated request redirected to sign-in");
            Redirect::temporary(&location).into_response()
        }
    }
}
