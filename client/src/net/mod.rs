//! Network layer: transport seam, request gateway, and identity API wrappers.

pub mod api;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;
