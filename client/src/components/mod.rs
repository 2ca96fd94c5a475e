//! Reusable UI components shared across pages.

pub mod oauth_buttons;
