//! Credential persistence across the two storage tiers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The edge-visible tier (a cookie) is what the route guard reads before any
//! protected page renders. The page-only tier (`localStorage`) mirrors the
//! token and carries the display-only user profile. Only
//! [`SessionManager`](crate::session::SessionManager) writes to either tier.

pub mod cookie;
pub mod memory;

#[cfg(feature = "hydrate")]
pub mod browser;

use time::Duration;

pub use memory::MemoryTier;

/// Cookie name holding the bearer credential in the edge-visible tier.
pub const TOKEN_COOKIE: &str = "token";

/// Page-only key mirroring the bearer credential.
pub const PAGE_TOKEN_KEY: &str = "token";

/// Page-only key holding the JSON user profile blob.
pub const PAGE_USER_KEY: &str = "user";

/// One physical key-value store.
///
/// Each operation is atomic at single-key granularity; nothing spans keys or
/// tiers.
pub trait CredentialTier: Send + Sync {
    /// Read a live value. Expired or missing keys read as `None`.
    fn read(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`. `ttl` is honored by tiers that support
    /// native expiry and ignored by tiers that do not.
    fn write(&self, key: &str, value: &str, ttl: Option<Duration>);

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str);
}
