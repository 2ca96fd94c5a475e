//! # client
//!
//! Leptos front-end for Ventry: sign-in, sign-up, the Google OAuth callback and
//! the gated dashboard, on top of a small authentication core.
//!
//! The core is three pieces that share one credential: [`session`] stores and
//! renews it, [`net::gateway`] attaches it to every API call and ends the
//! session on rejection, and [`guard`] decides which navigations need it. The
//! server crate runs the same [`guard`] decision as edge middleware.

pub mod app;
pub mod components;
pub mod config;
pub mod flows;
pub mod guard;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
mod test_helpers;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("hydrating");
    leptos::mount::hydrate_body(app::App);
}
