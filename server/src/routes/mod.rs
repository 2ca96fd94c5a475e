//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the Leptos SSR app, its static `pkg/` assets and a
//! health check. Every request passes the edge guard first, so protected pages
//! are never rendered for a request without the credential cookie.

pub mod guard;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Wrap `router` with the edge guard and request tracing.
pub fn guarded(router: Router) -> Router {
    router
        .layer(middleware::from_fn(guard::edge_guard))
        .layer(TraceLayer::new_for_http())
}

/// Full application router.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `Cargo.toml` `[package.metadata.leptos]` section).
pub fn app(config: &ServerConfig) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| e.to_string())?;
    let mut leptos_options = conf.leptos_options;
    if let Some(site_root) = &config.site_root {
        leptos_options.site_root = site_root.to_string_lossy().into_owned().into();
    }
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());
    tracing::debug!(site_root = %site_root_path.display(), "serving static assets");

    Ok(guarded(
        Router::new()
            .route("/healthz", get(healthz))
            .merge(leptos_router)
            .nest_service("/pkg", ServeDir::new(site_root_path.join(leptos_options.site_pkg_dir.as_ref()))),
    ))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
