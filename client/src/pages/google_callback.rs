//! Landing page for the Google OAuth redirect.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::state::auth::AuthContext;

/// Delay before leaving a failed callback, so the status is readable.
#[cfg(feature = "hydrate")]
const FAILURE_REDIRECT_DELAY: std::time::Duration = std::time::Duration::from_secs(3);

#[component]
pub fn GoogleCallbackPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let query = use_query_map();
    let status = RwSignal::new("Processing your sign-in...".to_owned());

    #[cfg(feature = "hydrate")]
    {
        let gateway = auth.gateway.clone();
        let code = query.get_untracked().get("code");
        Effect::new(move || {
            let gateway = gateway.clone();
            let code = code.clone();
            leptos::task::spawn_local(async move {
                if code.is_none() {
                    gateway.navigator().navigate(&crate::flows::callback_failure_url());
                    return;
                }
                status.set("Connecting to authentication service...".to_owned());
                match crate::flows::complete_google_callback(&gateway, code.as_deref()).await {
                    Ok(target) => gateway.navigator().navigate(&target),
                    Err(e) => {
                        log::error!("google sign-in failed: {e}");
                        status.set(crate::flows::AUTH_FAILED_MESSAGE.to_owned());
                        gloo_timers::future::sleep(FAILURE_REDIRECT_DELAY).await;
                        gateway.navigator().navigate(&crate::flows::callback_failure_url());
                    }
                }
            });
        });
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = (&auth, query);

    view! {
        <div class="auth-page">
            <div class="auth-card auth-card--status">
                <h1>"Completing Sign In"</h1>
                <p class="auth-message">{move || status.get()}</p>
            </div>
        </div>
    }
}
