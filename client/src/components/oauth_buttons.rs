//! "Continue with Google / Apple" buttons shared by sign-in and sign-up.

use leptos::prelude::*;

use crate::net::types::OAuthProvider;
use crate::state::auth::AuthContext;

#[component]
pub fn OAuthButtons(busy: RwSignal<bool>, error: RwSignal<String>) -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    let start = move |provider: OAuthProvider| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        error.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let gateway = auth.gateway.clone();
            leptos::task::spawn_local(async move {
                match crate::flows::begin_oauth(&gateway, provider).await {
                    Ok(url) => gateway.navigator().navigate(&url),
                    Err(e) => {
                        error.set(e.user_message());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&auth, provider);
    };

    view! {
        <div class="auth-oauth">
            {[OAuthProvider::Google, OAuthProvider::Apple]
                .into_iter()
                .map(|provider| {
                    let start = start.clone();
                    view! {
                        <button
                            class="auth-button auth-button--oauth"
                            type="button"
                            disabled=move || busy.get()
                            on:click=move |_| start(provider)
                        >
                            {format!("Continue with {}", provider.label())}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
