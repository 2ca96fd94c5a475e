//! In-process tier used for SSR, native callers and tests.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use time::{Duration, OffsetDateTime};

use super::CredentialTier;
use crate::util::clock::{Clock, SystemClock};

struct Entry {
    value: String,
    expires_at: Option<OffsetDateTime>,
}

/// `HashMap`-backed tier that enforces TTL against an injected clock, the way
/// a browser evicts a cookie once its `Max-Age` elapses.
pub struct MemoryTier {
    entries: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock }
    }

    /// Number of stored keys, including ones that have expired but have not
    /// been read since.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialTier for MemoryTier {
    fn read(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();
        let expired = entries
            .get(key)
            .is_some_and(|e| e.expires_at.is_some_and(|at| at <= now));
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    fn write(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| self.clock.now() + ttl);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), Entry { value: value.to_owned(), expires_at });
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
