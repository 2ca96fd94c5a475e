//! Sign-in page: email + password, optional exclusive-access code, OAuth.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::oauth_buttons::OAuthButtons;
use crate::flows::FlowError;
use crate::guard::SIGN_UP_PATH;
use crate::state::auth::AuthContext;
use crate::util::validation::{Field, FieldErrors, SignInInput};

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let query = use_query_map();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let exclusive_code = RwSignal::new(String::new());
    let field_errors = RwSignal::new(FieldErrors::default());
    let error = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Explanation passed by a guard or an expired session.
    let notice = move || query.get().get("error").unwrap_or_default();

    let on_submit = {
        let auth = auth.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            let input = SignInInput {
                email: email.get(),
                password: password.get(),
                exclusive_code: exclusive_code.get(),
            };
            let redirect = query.get_untracked().get("redirect");
            busy.set(true);
            error.set(String::new());
            field_errors.set(FieldErrors::default());

            #[cfg(feature = "hydrate")]
            {
                let gateway = auth.gateway.clone();
                leptos::task::spawn_local(async move {
                    match crate::flows::sign_in(&gateway, &input, redirect.as_deref()).await {
                        Ok(target) => gateway.navigator().navigate(&target),
                        Err(FlowError::Validation(errors)) => {
                            field_errors.set(errors);
                            busy.set(false);
                        }
                        Err(e) => {
                            error.set(e.user_message());
                            busy.set(false);
                        }
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            let _ = (&auth, input, redirect);
        }
    };

    let on_request_code = move |_| {
        if busy.get() {
            return;
        }
        let email_value = email.get();
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let gateway = auth.gateway.clone();
            busy.set(true);
            leptos::task::spawn_local(async move {
                match crate::flows::request_code(&gateway, &email_value).await {
                    Ok(_) => info.set(format!("Check {} for your exclusive access code", email_value.trim())),
                    Err(FlowError::Validation(errors)) => field_errors.set(errors),
                    Err(e) => error.set(e.user_message()),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&auth, email_value);
    };

    let field_message = move |field: Field| move || field_errors.get().message_for(field).unwrap_or_default();

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Welcome back"</h1>
                <Show when=move || !notice().is_empty()>
                    <p class="auth-message auth-message--notice">{notice}</p>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <p class="auth-field-error">{field_message(Field::Email)}</p>
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <p class="auth-field-error">{field_message(Field::Password)}</p>
                    <details class="auth-exclusive">
                        <summary>"Exclusive access"</summary>
                        <input
                            class="auth-input"
                            type="text"
                            placeholder="Enter your exclusive code"
                            prop:value=move || exclusive_code.get()
                            on:input=move |ev| exclusive_code.set(event_target_value(&ev))
                        />
                        <button class="auth-link" type="button" on:click=on_request_code>
                            "Request a code"
                        </button>
                    </details>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !error.get().is_empty()>
                    <p class="auth-message auth-message--error">{move || error.get()}</p>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <div class="auth-divider"></div>
                <OAuthButtons busy=busy error=error/>
                <p class="auth-footer">
                    "Don't have an account? " <a href=SIGN_UP_PATH>"Sign up"</a>
                </p>
            </div>
        </div>
    }
}
