//! Shared fixtures for client unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration as StdDuration;

use serde_json::Value;

use crate::config::{CREDENTIAL_TTL, ClientConfig};
use crate::net::error::TransportError;
use crate::net::gateway::{Gateway, Navigator, Notifier};
use crate::net::transport::{HttpRequest, HttpResponse, Transport};
use crate::session::{RenewalHandle, SessionManager, Timer};
use crate::storage::MemoryTier;
use crate::util::clock::{Clock, ManualClock};

pub const TEST_API_BASE: &str = "https://api.test";

// =============================================================================
// Session
// =============================================================================

pub struct TestSession {
    pub session: SessionManager,
    pub clock: Arc<ManualClock>,
    pub edge: Arc<MemoryTier>,
    pub page: Arc<MemoryTier>,
}

pub fn test_session() -> TestSession {
    let clock = Arc::new(ManualClock::default());
    let dyn_clock: Arc<dyn Clock> = clock.clone();
    let edge = Arc::new(MemoryTier::with_clock(dyn_clock.clone()));
    let page = Arc::new(MemoryTier::with_clock(dyn_clock.clone()));
    let session = SessionManager::new(edge.clone(), page.clone(), dyn_clock, CREDENTIAL_TTL);
    TestSession { session, clock, edge, page }
}

// =============================================================================
// Transport
// =============================================================================

type SendHook = Box<dyn Fn(&HttpRequest) + Send + Sync>;

/// Replays scripted responses in order and records every request.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
    hook: Mutex<Option<SendHook>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &Value) -> &Self {
        self.push(Ok(HttpResponse { status, body: body.to_string() }))
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.push(Ok(HttpResponse { status, body: body.to_owned() }))
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.push(Err(TransportError::Network(message.to_owned())))
    }

    /// Run `hook` while each request is "on the wire".
    pub fn on_send(&self, hook: impl Fn(&HttpRequest) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(hook) = self.hook.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            hook(&request);
        }
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_owned())))
    }
}

// =============================================================================
// Navigation and toasts
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    hrefs: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn hrefs(&self) -> Vec<String> {
        self.hrefs.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, href: &str) {
        self.hrefs.lock().unwrap().push(href.to_owned());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_owned());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_owned());
    }
}

// =============================================================================
// Gateway
// =============================================================================

pub struct TestGateway {
    pub gateway: Gateway,
    pub t: TestSession,
    pub transport: Arc<StubTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_config() -> ClientConfig {
    ClientConfig { api_base_url: TEST_API_BASE.to_owned(), ..ClientConfig::default() }
}

pub fn test_gateway() -> TestGateway {
    let t = test_session();
    let transport = Arc::new(StubTransport::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let gateway = Gateway::new(
        Arc::new(test_config()),
        t.session.clone(),
        transport.clone(),
        navigator.clone(),
        notifier.clone(),
    );
    TestGateway { gateway, t, transport, navigator, notifier }
}

// =============================================================================
// Timer
// =============================================================================

/// Timer whose sleeps complete immediately. Cancels `target` once `cancel_after`
/// sleeps have elapsed, so loops under test terminate.
pub struct FakeTimer {
    pub sleeps: Arc<AtomicUsize>,
    pub target: Arc<OnceLock<RenewalHandle>>,
    cancel_after: usize,
    pub durations: Arc<Mutex<Vec<StdDuration>>>,
}

impl FakeTimer {
    pub fn cancel_after(cancel_after: usize) -> Self {
        Self {
            sleeps: Arc::new(AtomicUsize::new(0)),
            target: Arc::new(OnceLock::new()),
            cancel_after,
            durations: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl Timer for FakeTimer {
    async fn sleep(&self, duration: StdDuration) {
        self.durations.lock().unwrap().push(duration);
        let n = self.sleeps.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.cancel_after {
            if let Some(handle) = self.target.get() {
                handle.cancel();
            }
        }
    }
}

/// Timer whose sleeps return immediately until `ready` of them have run. The
/// next sleep cancels `target` and then never completes on its own.
pub struct StalledTimer {
    pub target: Arc<OnceLock<RenewalHandle>>,
    ready: usize,
    sleeps: AtomicUsize,
}

impl StalledTimer {
    pub fn after(ready: usize) -> Self {
        Self { target: Arc::new(OnceLock::new()), ready, sleeps: AtomicUsize::new(0) }
    }
}

#[async_trait::async_trait(?Send)]
impl Timer for StalledTimer {
    async fn sleep(&self, _duration: StdDuration) {
        if self.sleeps.fetch_add(1, Ordering::SeqCst) < self.ready {
            return;
        }
        if let Some(handle) = self.target.get() {
            handle.cancel();
        }
        futures::future::pending::<()>().await;
    }
}
