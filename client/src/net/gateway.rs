//! Authenticated request gateway.
//!
//! ARCHITECTURE
//! ============
//! Every call to the identity API goes through [`Gateway::call`]. It attaches
//! the bearer credential, classifies the response, and owns the one and only
//! reaction to an expired session: clear the credential, then hard-navigate to
//! the sign-in page. Pages never handle 401 themselves.
//!
//! ERROR HANDLING
//! ==============
//! Errors pass through a single notification boundary (optional toast) and are
//! then returned unchanged so callers can still react.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::transport::{HttpRequest, Method, STATUS_UNAUTHORIZED, Transport};
use crate::config::ClientConfig;
use crate::guard;
use crate::session::SessionManager;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const DEFAULT_TOAST_ERROR: &str = "An error occurred";

/// Performs full (non-SPA) navigations.
pub trait Navigator: Send + Sync {
    fn navigate(&self, href: &str);
}

/// Toast sink.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Navigator that only records intent in the log (SSR).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, href: &str) {
        log::info!("navigation to {href} requested outside the browser");
    }
}

/// Notifier that writes toasts to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Assigns `window.location.href`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowNavigator;

#[cfg(feature = "hydrate")]
impl Navigator for WindowNavigator {
    fn navigate(&self, href: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(href);
        }
    }
}

/// Per-call knobs.
#[derive(Clone, Debug, PartialEq)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Merged over the defaults; same-named headers replace them.
    pub headers: Vec<(String, String)>,
    pub show_toast: bool,
    /// Success toast text. Successes are silent when unset.
    pub toast_success: Option<String>,
    pub toast_error: String,
    /// Unauthenticated endpoint: a 401 is an ordinary error (e.g. wrong
    /// password), not an expired session.
    pub public: bool,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            body: None,
            headers: Vec::new(),
            show_toast: true,
            toast_success: None,
            toast_error: DEFAULT_TOAST_ERROR.to_owned(),
            public: false,
        }
    }
}

impl CallOptions {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post(body: Value) -> Self {
        Self { method: Method::Post, body: Some(body), ..Self::default() }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Suppress both toasts.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.show_toast = false;
        self
    }

    #[must_use]
    pub fn toast_success(mut self, message: impl Into<String>) -> Self {
        self.toast_success = Some(message.into());
        self
    }

    #[must_use]
    pub fn toast_error(mut self, message: impl Into<String>) -> Self {
        self.toast_error = message.into();
        self
    }

    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

/// Default headers plus caller overrides, matched case-insensitively.
pub(crate) fn merge_headers(token: Option<&str>, extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
    if let Some(token) = token {
        headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
    }
    for (name, value) in extra {
        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1.clone_from(value),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// The single chokepoint for identity API calls.
///
/// Clone is cheap; all collaborators are shared.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<ClientConfig>,
    session: SessionManager,
    transport: Arc<dyn Transport>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl Gateway {
    #[must_use]
    pub fn new(
        config: Arc<ClientConfig>,
        session: SessionManager,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { config, session, transport, navigator, notifier }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<ClientConfig> {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    #[must_use]
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Call `endpoint` and return its JSON body.
    ///
    /// `Ok(None)` means the protected endpoint answered 401: the session has
    /// been cleared and a navigation to sign-in is already under way.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses (carrying status and body
    /// text) and unparseable bodies.
    pub async fn call(&self, endpoint: &str, options: CallOptions) -> Result<Option<Value>, ApiError> {
        self.call_json(endpoint, options).await
    }

    /// [`Gateway::call`] decoding the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`Gateway::call`]; a body that does not match `T` is
    /// [`ApiError::Decode`].
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: CallOptions,
    ) -> Result<Option<T>, ApiError> {
        let result = self.dispatch(endpoint, &options).await.and_then(|body| {
            body.map(|text| serde_json::from_str::<T>(&text).map_err(|e| ApiError::Decode(e.to_string())))
                .transpose()
        });
        self.report(&options, result.as_ref().map(Option::is_some));
        result
    }

    async fn dispatch(&self, endpoint: &str, options: &CallOptions) -> Result<Option<String>, ApiError> {
        let token = self.session.credential();
        log::debug!(
            "fetching {endpoint} with token: {}",
            if token.is_some() { "present" } else { "missing" }
        );

        let request = HttpRequest {
            method: options.method,
            url: self.config.endpoint_url(endpoint),
            headers: merge_headers(token.as_deref(), &options.headers),
            body: options.body.as_ref().map(Value::to_string),
        };
        let response = self.transport.send(request).await?;

        if response.status == STATUS_UNAUTHORIZED && !options.public {
            log::info!("{endpoint} rejected the credential; ending session");
            self.expire_session();
            return Ok(None);
        }
        if !response.is_success() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        Ok(Some(response.body))
    }

    fn report(&self, options: &CallOptions, result: Result<bool, &ApiError>) {
        if !options.show_toast {
            return;
        }
        match result {
            Ok(true) => {
                if let Some(message) = &options.toast_success {
                    self.notifier.success(message);
                }
            }
            Ok(false) => {}
            Err(err) => self.notifier.error(&format!("{}: {err}", options.toast_error)),
        }
    }

    /// Clear the credential and hard-navigate to sign-in with the expiry
    /// explanation.
    pub fn expire_session(&self) {
        self.session.clear_credential();
        self.navigator
            .navigate(&guard::sign_in_url(SESSION_EXPIRED_MESSAGE, None));
    }
}
