//! Client configuration.
//!
//! The browser build has no process environment, so the API base URL is baked
//! in at compile time from `VENTRY_API_URL`. An empty base means same-origin.

use std::time::Duration as StdDuration;

use time::Duration;

/// Lifetime the client asserts for every credential it stores.
pub const CREDENTIAL_TTL: Duration = Duration::days(1);

/// Fixed cadence of the silent renewal loop.
pub const RENEWAL_INTERVAL: StdDuration = StdDuration::from_secs(20 * 60);

/// Runtime knobs for the auth core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined to every identity API endpoint (e.g. `https://api.example.com`).
    pub api_base_url: String,
    /// Whether the credential cookie carries the `Secure` attribute.
    pub secure_cookies: bool,
    /// Time between renewal attempts.
    pub renewal_interval: StdDuration,
    /// Client-side credential lifetime.
    pub credential_ttl: Duration,
}

impl ClientConfig {
    /// Build from compile-time settings. Release builds set `Secure` cookies.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self {
            api_base_url: option_env!("VENTRY_API_URL")
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_owned(),
            secure_cookies: !cfg!(debug_assertions),
            ..Self::default()
        }
    }

    /// Join `endpoint` (which starts with `/`) onto the API base.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            secure_cookies: false,
            renewal_interval: RENEWAL_INTERVAL,
            credential_ttl: CREDENTIAL_TTL,
        }
    }
}
