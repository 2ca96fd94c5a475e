//! Session token manager: the single owner of the credential lifecycle.
//!
//! ARCHITECTURE
//! ============
//! One logical credential, two physical copies. Every write goes edge tier
//! first, then page tier, inside one synchronous call, so code that runs after
//! `set_credential` returns can navigate and the edge guard will see the
//! token. Reads for gating use the edge tier only.
//!
//! Renewal lives in [`renewal`] as an explicitly owned task so independent
//! sessions (tests, multiple mounts) never share timer state.

pub mod renewal;


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::{Duration, OffsetDateTime};

use crate::config::{CREDENTIAL_TTL, ClientConfig};
use crate::storage::{CredentialTier, MemoryTier, PAGE_TOKEN_KEY, PAGE_USER_KEY, TOKEN_COOKIE};
use crate::util::clock::{Clock, SystemClock};

pub use renewal::{RenewalHandle, RenewalTask, TickOutcome, Timer};

/// Snapshot of a credential as written by [`SessionManager::set_credential`].
#[derive(Clone, Debug, PartialEq)]
pub struct Credential {
    pub access_token: String,
    /// Issue time plus the fixed client TTL. Not server-supplied.
    pub expires_at: OffsetDateTime,
    /// Display-only profile blob; never authoritative.
    pub user: Option<serde_json::Value>,
}

/// Handle to the credential stored across both tiers.
///
/// Clone is cheap; clones share the same tiers and renewal flag.
#[derive(Clone)]
pub struct SessionManager {
    edge: Arc<dyn CredentialTier>,
    page: Arc<dyn CredentialTier>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    renewing: Arc<AtomicBool>,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        edge: Arc<dyn CredentialTier>,
        page: Arc<dyn CredentialTier>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self { edge, page, clock, ttl, renewing: Arc::new(AtomicBool::new(false)) }
    }

    /// Session backed by in-process tiers and the system clock.
    #[must_use]
    pub fn in_memory() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::new(
            Arc::new(MemoryTier::with_clock(clock.clone())),
            Arc::new(MemoryTier::with_clock(clock.clone())),
            clock,
            CREDENTIAL_TTL,
        )
    }

    /// Session backed by `document.cookie` and `localStorage`.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn browser(config: &ClientConfig) -> Self {
        use crate::storage::browser::{CookieTier, LocalStorageTier};
        Self::new(
            Arc::new(CookieTier::new(config.secure_cookies)),
            Arc::new(LocalStorageTier),
            Arc::new(SystemClock),
            config.credential_ttl,
        )
    }

    /// Session for the current build target: browser storage under
    /// `hydrate`, in-process tiers otherwise.
    #[must_use]
    pub fn for_environment(config: &ClientConfig) -> Self {
        #[cfg(feature = "hydrate")]
        {
            Self::browser(config)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let mut session = Self::in_memory();
            session.ttl = config.credential_ttl;
            session
        }
    }

    /// Replace the credential in both tiers. The user blob goes to the
    /// page-only tier; a credential acquired without one drops any stored
    /// profile so it cannot be paired with a different identity.
    ///
    /// An empty token clears the session instead and returns `None`.
    pub fn set_credential(&self, token: &str, user: Option<&serde_json::Value>) -> Option<Credential> {
        let credential = self.write_token(token)?;
        match user {
            Some(user) => match serde_json::to_string(user) {
                Ok(raw) => self.page.write(PAGE_USER_KEY, &raw, None),
                Err(e) => {
                    log::warn!("user profile not stored: {e}");
                    self.page.remove(PAGE_USER_KEY);
                }
            },
            None => self.page.remove(PAGE_USER_KEY),
        }
        Some(Credential { user: user.cloned(), ..credential })
    }

    /// Swap in a refreshed token for the same identity. The stored profile is
    /// kept.
    pub fn renew_credential(&self, token: &str) -> Option<Credential> {
        let credential = self.write_token(token)?;
        Some(Credential { user: self.page_user(), ..credential })
    }

    fn write_token(&self, token: &str) -> Option<Credential> {
        if token.is_empty() {
            log::warn!("refusing to store empty credential; clearing session");
            self.clear_credential();
            return None;
        }

        let expires_at = self.clock.now() + self.ttl;
        self.edge.write(TOKEN_COOKIE, token, Some(self.ttl));
        self.page.write(PAGE_TOKEN_KEY, token, None);
        log::debug!("credential stored, expires at {expires_at}");

        Some(Credential { access_token: token.to_owned(), expires_at, user: None })
    }

    /// Current credential from the edge-visible tier. Missing or expired reads
    /// as `None`.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.edge.read(TOKEN_COOKIE).filter(|t| !t.is_empty())
    }

    /// Page-only mirror of the token.
    #[must_use]
    pub fn page_token(&self) -> Option<String> {
        self.page.read(PAGE_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Page-only user profile. Unparseable blobs read as `None`.
    #[must_use]
    pub fn page_user(&self) -> Option<serde_json::Value> {
        let raw = self.page.read(PAGE_USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Remove the credential from both tiers. Idempotent.
    pub fn clear_credential(&self) {
        self.edge.remove(TOKEN_COOKIE);
        self.page.remove(PAGE_TOKEN_KEY);
        self.page.remove(PAGE_USER_KEY);
        log::debug!("credential cleared");
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Claim the session's single renewal slot. `None` while another renewal
    /// call is outstanding; the slot is released when the guard drops.
    #[must_use]
    pub fn try_begin_renewal(&self) -> Option<RenewalSlot> {
        self.renewing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RenewalSlot { flag: self.renewing.clone() })
    }
}

/// Proof that the holder owns the in-flight renewal slot.
pub struct RenewalSlot {
    flag: Arc<AtomicBool>,
}

impl Drop for RenewalSlot {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
