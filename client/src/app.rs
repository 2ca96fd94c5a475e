//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{ParentRoute, Redirect, Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::guard::DEFAULT_LANDING_PATH;
use crate::pages::{
    dashboard::{DashboardLayout, DashboardPage},
    google_callback::GoogleCallbackPage,
    sign_in::SignInPage,
    sign_up::SignUpPage,
};
use crate::state::auth::{AuthContext, AuthState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth context and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    provide_context(AuthContext::for_environment(ClientConfig::from_build_env()));
    provide_context(RwSignal::new(AuthState::default()));

    view! {
        <Stylesheet id="leptos" href="/pkg/ventry.css"/>
        <Title text="Ventry"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=|| view! { <Redirect path=DEFAULT_LANDING_PATH/> }/>
                <Route path=StaticSegment("sign-in") view=SignInPage/>
                <Route path=StaticSegment("sign-up") view=SignUpPage/>
                <Route
                    path=(StaticSegment("auth"), StaticSegment("google"), StaticSegment("callback"))
                    view=GoogleCallbackPage
                />
                <ParentRoute path=StaticSegment("dashboard") view=DashboardLayout>
                    <Route path=StaticSegment("") view=DashboardPage/>
                </ParentRoute>
            </Routes>
        </Router>
    }
}
