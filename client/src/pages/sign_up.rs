//! Account creation page.

use leptos::prelude::*;

use crate::components::oauth_buttons::OAuthButtons;
use crate::flows::FlowError;
use crate::guard::SIGN_IN_PATH;
use crate::state::auth::AuthContext;
use crate::util::validation::{Field, FieldErrors, SignUpInput};

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let accept_terms = RwSignal::new(false);
    let field_errors = RwSignal::new(FieldErrors::default());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = SignUpInput {
            name: name.get(),
            email: email.get(),
            password: password.get(),
            confirm_password: confirm_password.get(),
            accept_terms: accept_terms.get(),
        };
        busy.set(true);
        error.set(String::new());
        field_errors.set(FieldErrors::default());

        #[cfg(feature = "hydrate")]
        {
            let gateway = auth.gateway.clone();
            leptos::task::spawn_local(async move {
                match crate::flows::sign_up(&gateway, &input).await {
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
        let _ = (&auth, input);
    };

    let field_message = move |field: Field| move || field_errors.get().message_for(field).unwrap_or_default();

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="text"
                        placeholder="Full name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <p class="auth-field-error">{field_message(Field::Name)}</p>
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
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Confirm password"
                        prop:value=move || confirm_password.get()
                        on:input=move |ev| confirm_password.set(event_target_value(&ev))
                    />
                    <p class="auth-field-error">{field_message(Field::ConfirmPassword)}</p>
                    <label class="auth-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || accept_terms.get()
                            on:change=move |ev| accept_terms.set(event_target_checked(&ev))
                        />
                        "I accept the terms and conditions"
                    </label>
                    <p class="auth-field-error">{field_message(Field::AcceptTerms)}</p>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign up" }}
                    </button>
                </form>
                <Show when=move || !error.get().is_empty()>
                    <p class="auth-message auth-message--error">{move || error.get()}</p>
                </Show>
                <div class="auth-divider"></div>
                <OAuthButtons busy=busy error=error/>
                <p class="auth-footer">
                    "Already have an account? " <a href=SIGN_IN_PATH>"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
