//! Auth flows behind the sign-in, sign-up, callback and dashboard pages.
//!
//! Each flow validates, calls the identity API, and updates the session. The
//! navigation target is handed back so the page decides when to leave.

#[cfg(test)]
#[path = "flows_test.rs"]
mod flows_test;

use crate::guard::{self, DEFAULT_LANDING_PATH, SIGN_IN_PATH};
use crate::net::api;
use crate::net::error::ApiError;
use crate::net::gateway::Gateway;
use crate::net::types::{AuthResponse, CodeResponse, OAuthProvider, User};
use crate::util::validation::{self, FieldErrors, SignInInput, SignUpInput};

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("missing authorization code")]
    MissingCode,
    /// A protected call rejected the credential; navigation is under way.
    #[error("session expired")]
    SessionExpired,
}

impl From<FieldErrors> for FlowError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl FlowError {
    /// Inline form text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

fn store(gateway: &Gateway, auth: &AuthResponse) {
    gateway.session().set_credential(&auth.access_token, auth.user.as_ref());
}

/// Password sign-in. Returns the post-login destination, honouring a local
/// `redirect` query value.
///
/// # Errors
///
/// Field errors before any call, or the API failure.
pub async fn sign_in(
    gateway: &Gateway,
    input: &SignInInput,
    redirect: Option<&str>,
) -> Result<String, FlowError> {
    let request = validation::validate_sign_in(input)?;
    let auth = api::login(gateway, &request).await?;
    store(gateway, &auth);
    log::info!("signed in");
    Ok(guard::redirect_target(redirect))
}

/// Account creation; a new account lands on the dashboard.
///
/// # Errors
///
/// Field errors before any call, or the API failure.
pub async fn sign_up(gateway: &Gateway, input: &SignUpInput) -> Result<String, FlowError> {
    let request = validation::validate_sign_up(input)?;
    let auth = api::signup(gateway, &request).await?;
    store(gateway, &auth);
    log::info!("account created");
    Ok(DEFAULT_LANDING_PATH.to_owned())
}

/// Provider authorization URL to navigate to.
///
/// # Errors
///
/// The API failure, including a body without `authorization_url`.
pub async fn begin_oauth(gateway: &Gateway, provider: OAuthProvider) -> Result<String, FlowError> {
    log::debug!("starting {provider} sign-in");
    Ok(api::authorization_url(gateway, provider).await?)
}

/// Finish the Google redirect. On error the page should navigate to
/// [`callback_failure_url`].
///
/// # Errors
///
/// [`FlowError::MissingCode`] without a `code`, or the exchange failure.
pub async fn complete_google_callback(gateway: &Gateway, code: Option<&str>) -> Result<String, FlowError> {
    let code = code.map(str::trim).filter(|c| !c.is_empty()).ok_or(FlowError::MissingCode)?;
    let auth = api::exchange_google_code(gateway, code).await?;
    store(gateway, &auth);
    log::info!("signed in with google");
    Ok(DEFAULT_LANDING_PATH.to_owned())
}

#[must_use]
pub fn callback_failure_url() -> String {
    guard::sign_in_url(AUTH_FAILED_MESSAGE, None)
}

/// Ask the backend to email an exclusive-access code.
///
/// # Errors
///
/// Field error for a bad email, or the API failure.
pub async fn request_code(gateway: &Gateway, email: &str) -> Result<CodeResponse, FlowError> {
    let email = validation::validate_code_request(email)?;
    Ok(api::request_code(gateway, &email).await?)
}

/// Profile of the signed-in user.
///
/// # Errors
///
/// [`FlowError::SessionExpired`] when the credential was rejected.
pub async fn load_profile(gateway: &Gateway) -> Result<User, FlowError> {
    api::current_user(gateway).await?.ok_or(FlowError::SessionExpired)
}

/// Inline dashboard text for a failed [`load_profile`]. `None` for an expired
/// session, which the sign-in page explains instead.
#[must_use]
pub fn profile_failure_message(err: &FlowError) -> Option<String> {
    match err {
        FlowError::SessionExpired => None,
        other => Some(format!("{}: {}", api::PROFILE_LOAD_FAILED, other.user_message())),
    }
}

/// Drop the credential and leave for the sign-in page.
pub fn sign_out(gateway: &Gateway) {
    gateway.session().clear_credential();
    log::info!("signed out");
    gateway.navigator().navigate(SIGN_IN_PATH);
}
