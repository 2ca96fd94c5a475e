//! Wall-clock seam for credential expiry bookkeeping.
//!
//! `OffsetDateTime::now_utc` is unavailable on `wasm32-unknown-unknown`, so the
//! browser build reads `Date.now()` instead.

use std::sync::{Mutex, PoisonError};

use time::{Duration, OffsetDateTime};

/// Source of "now" for TTL decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(feature = "hydrate")]
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> OffsetDateTime {
        let millis = js_sys::Date::now() as i128;
        OffsetDateTime::from_unix_timestamp_nanos(millis * 1_000_000).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }

    #[cfg(not(feature = "hydrate"))]
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: OffsetDateTime) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH + Duration::days(20_000))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
