//! Silent credential renewal.
//!
//! A [`RenewalTask`] is an owned loop: sleep for the fixed interval, then try
//! one refresh. The first failed refresh ends the loop for good and leaves the
//! current credential to expire naturally. Cancelling interrupts the current
//! sleep, but a refresh already on the wire still lands.

#[cfg(test)]
#[path = "renewal_test.rs"]
mod renewal_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use futures::channel::oneshot;
use futures::future::{self, Either, LocalBoxFuture};

use super::SessionManager;
use crate::config::ClientConfig;
use crate::net::api;
use crate::net::transport::Transport;

/// Async sleep seam.
#[async_trait::async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: StdDuration);
}

/// `setTimeout`-backed timer.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

#[cfg(feature = "hydrate")]
#[async_trait::async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: StdDuration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// Result of one renewal attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing stored; skipped.
    NoCredential,
    /// Another renewal call is outstanding for this session; skipped.
    InFlight,
    Renewed,
    /// Refresh succeeded but the credential changed while it was on the wire
    /// (sign-out, new sign-in); the response was discarded.
    Superseded,
    /// Refresh failed. The loop stops.
    Failed,
}

/// Cancellation handle shared between the caller and the running loop.
#[derive(Clone, Debug)]
pub struct RenewalHandle {
    cancelled: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
    wake: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl RenewalHandle {
    fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let handle = Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            stopped: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Mutex::new(Some(tx))),
        };
        (handle, rx)
    }

    /// Stop rescheduling and wake a sleeping loop. Idempotent, and a no-op
    /// once the loop has stopped.
    pub fn cancel(&self) {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(wake) = self.wake.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let _ = wake.send(());
        }
        if !self.stopped.load(Ordering::Acquire) {
            log::debug!("renewal cancelled");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether the loop will tick again.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.stopped.load(Ordering::Acquire)
    }

    fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}

/// Owned renewal loop for one session.
pub struct RenewalTask {
    session: SessionManager,
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
    timer: Box<dyn Timer>,
    handle: RenewalHandle,
    cancel_rx: Option<oneshot::Receiver<()>>,
}

impl RenewalTask {
    #[must_use]
    pub fn new(
        session: SessionManager,
        transport: Arc<dyn Transport>,
        config: Arc<ClientConfig>,
        timer: Box<dyn Timer>,
    ) -> Self {
        let (handle, cancel_rx) = RenewalHandle::new();
        Self { session, transport, config, timer, handle, cancel_rx: Some(cancel_rx) }
    }

    #[must_use]
    pub fn handle(&self) -> RenewalHandle {
        self.handle.clone()
    }

    /// One renewal attempt.
    pub async fn tick(&self) -> TickOutcome {
        let Some(token) = self.session.credential() else {
            return TickOutcome::NoCredential;
        };
        let Some(_slot) = self.session.try_begin_renewal() else {
            log::debug!("renewal already in flight; skipping tick");
            return TickOutcome::InFlight;
        };

        match api::refresh(self.transport.as_ref(), &self.config, &token).await {
            Ok(fresh) => {
                if self.session.credential().as_deref() != Some(token.as_str()) {
                    log::debug!("credential changed during renewal; discarding refreshed token");
                    return TickOutcome::Superseded;
                }
                self.session.renew_credential(&fresh.access_token);
                log::info!("credential renewed");
                TickOutcome::Renewed
            }
            Err(e) => {
                log::warn!("credential renewal failed, stopping renewal: {e}");
                TickOutcome::Failed
            }
        }
    }

    /// Drive the loop until cancelled or a refresh fails.
    pub async fn run(mut self) {
        let interval = self.config.renewal_interval;
        let Some(mut cancel_rx) = self.cancel_rx.take() else {
            self.handle.mark_stopped();
            return;
        };
        log::debug!("renewal scheduled every {}s", interval.as_secs());
        loop {
            let sleep = self.timer.sleep(interval);
            if let Either::Right(_) = future::select(sleep, &mut cancel_rx).await {
                break;
            }
            if self.handle.is_cancelled() {
                break;
            }
            if self.tick().await == TickOutcome::Failed {
                break;
            }
        }
        self.handle.mark_stopped();
    }

    /// Hand the loop to `spawn` and return its handle.
    pub fn start(self, spawn: impl FnOnce(LocalBoxFuture<'static, ()>)) -> RenewalHandle {
        let handle = self.handle();
        spawn(Box::pin(self.run()));
        handle
    }

    /// Start on the Leptos local executor.
    #[cfg(feature = "hydrate")]
    pub fn spawn_local(self) -> RenewalHandle {
        self.start(|fut| leptos::task::spawn_local(fut))
    }
}
