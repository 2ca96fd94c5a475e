//! Identity API wrappers.
//!
//! Everything except [`refresh`] goes through the [`Gateway`]. Sign-in style
//! endpoints are public so a rejected password surfaces as an inline error
//! instead of an expired-session redirect.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use super::gateway::{CallOptions, Gateway};
use super::transport::{HttpRequest, Method, Transport};
use super::types::{
    AuthResponse, CodeRequest, CodeResponse, LoginRequest, OAuthProvider, RefreshResponse,
    SignupRequest, User,
};
use crate::config::ClientConfig;

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const SIGNUP_ENDPOINT: &str = "/api/auth/signup";
pub const REQUEST_CODE_ENDPOINT: &str = "/api/auth/request-code";
pub const REFRESH_ENDPOINT: &str = "/api/auth/refresh";
pub const CURRENT_USER_ENDPOINT: &str = "/api/users/me";

pub const PROFILE_LOAD_FAILED: &str = "Failed to load profile";

fn oauth_url_endpoint(provider: OAuthProvider) -> String {
    format!("/api/auth/{provider}")
}

fn google_callback_endpoint(code: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("code", code)
        .finish();
    format!("/api/auth/google/callback?{query}")
}

fn json_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Public calls always produce a body; a missing one would be a gateway bug.
fn required<T>(value: Option<T>, endpoint: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::InvalidResponse(format!("{endpoint} returned no body")))
}

fn require_token(auth: AuthResponse) -> Result<AuthResponse, ApiError> {
    if auth.access_token.is_empty() {
        return Err(ApiError::InvalidResponse("missing access_token".to_owned()));
    }
    Ok(auth)
}

async fn public_post<B: Serialize, T: serde::de::DeserializeOwned>(
    gateway: &Gateway,
    endpoint: &str,
    body: &B,
) -> Result<T, ApiError> {
    let options = CallOptions::post(json_body(body)?).public().silent();
    required(gateway.call_json(endpoint, options).await?, endpoint)
}

/// `POST /api/auth/login`.
///
/// # Errors
///
/// Rejected credentials (including 401) come back as [`ApiError::Status`].
pub async fn login(gateway: &Gateway, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    require_token(public_post(gateway, LOGIN_ENDPOINT, request).await?)
}

/// `POST /api/auth/signup`.
///
/// # Errors
///
/// Validation or conflict responses as [`ApiError::Status`].
pub async fn signup(gateway: &Gateway, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
    require_token(public_post(gateway, SIGNUP_ENDPOINT, request).await?)
}

/// `POST /api/auth/request-code`.
///
/// # Errors
///
/// Non-success statuses as [`ApiError::Status`].
pub async fn request_code(gateway: &Gateway, email: &str) -> Result<CodeResponse, ApiError> {
    public_post(gateway, REQUEST_CODE_ENDPOINT, &CodeRequest { email: email.to_owned() }).await
}

/// Provider authorization URL from `GET /api/auth/{provider}`.
///
/// # Errors
///
/// [`ApiError::InvalidResponse`] when the body lacks `authorization_url`.
pub async fn authorization_url(gateway: &Gateway, provider: OAuthProvider) -> Result<String, ApiError> {
    let endpoint = oauth_url_endpoint(provider);
    let options = CallOptions::get()
        .public()
        .toast_error(format!("Failed to connect with {}", provider.label()));
    let body: Value = required(gateway.call_json(&endpoint, options).await?, &endpoint)?;
    body.get("authorization_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::InvalidResponse("Failed to get authorization URL".to_owned()))
}

/// Trade an OAuth authorization code for a credential.
///
/// # Errors
///
/// The backend answers rejected codes with plain text; that text is kept in
/// [`ApiError::Status`].
pub async fn exchange_google_code(gateway: &Gateway, code: &str) -> Result<AuthResponse, ApiError> {
    let endpoint = google_callback_endpoint(code);
    let options = CallOptions::get().public().silent();
    require_token(required(gateway.call_json(&endpoint, options).await?, &endpoint)?)
}

/// `GET /api/users/me`. `Ok(None)` when the session was rejected.
///
/// # Errors
///
/// As [`Gateway::call`].
pub async fn current_user(gateway: &Gateway) -> Result<Option<User>, ApiError> {
    let options = CallOptions::get().toast_error(PROFILE_LOAD_FAILED);
    gateway.call_json(CURRENT_USER_ENDPOINT, options).await
}

/// `POST /api/auth/refresh` with `token` as bearer.
///
/// Bypasses the gateway: a rejected refresh only stops renewal, it does not
/// end the session.
///
/// # Errors
///
/// Any transport failure, non-success status, or body without a token.
pub async fn refresh(
    transport: &dyn Transport,
    config: &ClientConfig,
    token: &str,
) -> Result<RefreshResponse, ApiError> {
    let request = HttpRequest {
        method: Method::Post,
        url: config.endpoint_url(REFRESH_ENDPOINT),
        headers: vec![
            ("Content-Type".to_owned(), "application/json".to_owned()),
            ("Authorization".to_owned(), format!("Bearer {token}")),
        ],
        body: None,
    };
    let response = transport.send(request).await?;
    if !response.is_success() {
        return Err(ApiError::from_status(response.status, &response.body));
    }
    let fresh: RefreshResponse =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
    if fresh.access_token.is_empty() {
        return Err(ApiError::InvalidResponse("missing access_token".to_owned()));
    }
    Ok(fresh)
}
