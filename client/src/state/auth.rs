//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthContext` carries the gateway (and through it the session) to every
//! page. `AuthState` is the reactive view of who is signed in.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::gateway::{Gateway, LogNotifier, Navigator};
use crate::net::transport::Transport;
use crate::net::types::User;
use crate::session::{RenewalTask, SessionManager};

/// Shared auth collaborators for the current build target.
#[derive(Clone)]
pub struct AuthContext {
    pub gateway: Gateway,
}

impl AuthContext {
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Browser storage, `fetch` and real navigation under `hydrate`; inert
    /// stand-ins during SSR.
    #[must_use]
    pub fn for_environment(config: ClientConfig) -> Self {
        let session = SessionManager::for_environment(&config);
        let (transport, navigator) = environment_io();
        Self::new(Gateway::new(Arc::new(config), session, transport, navigator, Arc::new(LogNotifier)))
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager {
        self.gateway.session()
    }

    /// Renewal loop for this session, driven by the browser timer.
    #[cfg(feature = "hydrate")]
    #[must_use]
    pub fn renewal_task(&self) -> RenewalTask {
        self.renewal_task_with(Box::new(crate::session::renewal::BrowserTimer))
    }

    /// Renewal loop with a caller-supplied timer.
    #[must_use]
    pub fn renewal_task_with(&self, timer: Box<dyn crate::session::Timer>) -> RenewalTask {
        RenewalTask::new(
            self.session().clone(),
            self.gateway.transport().clone(),
            self.gateway.config().clone(),
            timer,
        )
    }

    /// Profile cached at sign-in, used until `/api/users/me` answers.
    #[must_use]
    pub fn cached_user(&self) -> Option<User> {
        self.session()
            .page_user()
            .and_then(|raw| serde_json::from_value(raw).ok())
    }
}

#[cfg(feature = "hydrate")]
fn environment_io() -> (Arc<dyn Transport>, Arc<dyn Navigator>) {
    use crate::net::gateway::WindowNavigator;
    use crate::net::transport::GlooTransport;
    (Arc::new(GlooTransport), Arc::new(WindowNavigator))
}

#[cfg(not(feature = "hydrate"))]
fn environment_io() -> (Arc<dyn Transport>, Arc<dyn Navigator>) {
    use crate::net::gateway::LogNavigator;
    use crate::net::transport::UnavailableTransport;
    (Arc::new(UnavailableTransport), Arc::new(LogNavigator))
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}
