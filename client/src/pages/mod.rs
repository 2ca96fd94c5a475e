//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages are thin views over `crate::flows`; they own form signals and hand
//! the flow's navigation target to the gateway's navigator.

pub mod dashboard;
pub mod google_callback;
pub mod sign_in;
pub mod sign_up;
