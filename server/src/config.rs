//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before [`ServerConfig::from_env`] runs.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Overrides the Leptos `site-root` (where `pkg/` is served from).
    pub site_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Build from environment variables.
    ///
    /// Optional:
    /// - `HOST`: bind address, default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `SITE_ROOT`: compiled site directory, default from Leptos metadata
    ///
    /// # Errors
    ///
    /// A set but unparseable `HOST` or `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse("HOST", DEFAULT_HOST)?,
            port: env_parse("PORT", DEFAULT_PORT)?,
            site_root: std::env::var("SITE_ROOT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse `key` when set; fall back to `default` when unset or blank.
pub(crate) fn env_parse<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
        _ => Ok(default),
    }
}
