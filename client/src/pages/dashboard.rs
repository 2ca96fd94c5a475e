//! Dashboard: the protected area of the app.
//!
//! SYSTEM CONTEXT
//! ==============
//! `DashboardLayout` wraps every `/dashboard` route. During SSR it repeats the
//! edge guard against the incoming request; in the browser it checks the
//! session before client-side navigations render protected content.
//! `DashboardPage` keeps the session alive with the renewal task while mounted.

use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::state::auth::{AuthContext, AuthState};

#[component]
pub fn DashboardLayout() -> impl IntoView {
    #[cfg(feature = "ssr")]
    enforce_request_guard();

    #[cfg(feature = "hydrate")]
    {
        let auth = expect_context::<AuthContext>();
        let location = leptos_router::hooks::use_location();
        Effect::new(move || {
            let path = location.pathname.get();
            let token = auth.session().credential();
            if let crate::guard::GuardDecision::Redirect(url) = crate::guard::check(&path, token.as_deref()) {
                auth.gateway.navigator().navigate(&url);
            }
        });
    }

    view! { <Outlet/> }
}

/// Redirect the SSR response when the request carries no credential cookie.
#[cfg(feature = "ssr")]
fn enforce_request_guard() {
    use crate::guard::{GuardDecision, request_decision};

    let Some(parts) = use_context::<http::request::Parts>() else {
        return;
    };
    if let GuardDecision::Redirect(url) = request_decision(&parts) {
        log::debug!("render guard redirecting {}", parts.uri.path());
        leptos_axum::redirect(&url);
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = expect_context::<RwSignal<AuthState>>();
    let signing_out = RwSignal::new(false);
    let profile_error = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    {
        state.set(AuthState { user: auth.cached_user(), loading: true });

        let gateway = auth.gateway.clone();
        leptos::task::spawn_local(async move {
            match crate::flows::load_profile(&gateway).await {
                Ok(user) => state.set(AuthState { user: Some(user), loading: false }),
                Err(e) => {
                    log::warn!("profile load failed: {e}");
                    // Expired sessions are already on their way to sign-in.
                    if let Some(message) = crate::flows::profile_failure_message(&e) {
                        profile_error.set(Some(message));
                        state.update(|s| s.loading = false);
                    }
                }
            }
        });

        let renewal = auth.renewal_task().spawn_local();
        on_cleanup(move || renewal.cancel());
    }

    let on_sign_out = {
        let auth = auth.clone();
        move |_| {
            signing_out.set(true);
            crate::flows::sign_out(&auth.gateway);
        }
    };

    let greeting = move || {
        state
            .get()
            .user
            .map(|u| if u.name.is_empty() { u.email } else { u.name })
            .map_or_else(|| "Welcome".to_owned(), |who| format!("Welcome, {who}"))
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>"Dashboard"</h1>
                <button class="auth-button" on:click=on_sign_out disabled=move || signing_out.get()>
                    "Sign Out"
                </button>
            </header>
            <section class="dashboard-card">
                <h2>{greeting}</h2>
                <p>"You've successfully signed in to your account"</p>
                <Show when=move || state.get().loading>
                    <p class="auth-message">"Loading profile..."</p>
                </Show>
                <Show when=move || profile_error.get().is_some()>
                    <p class="auth-message auth-message--error">
                        {move || profile_error.get().unwrap_or_default()}
                    </p>
                </Show>
            </section>
        </div>
    }
}
