//! # wisp_core
//!
//! Core domain logic for the Wisp dashboard: client registration, the
//! Discord OAuth2 authorization-code flow, and the typed Settings API client.

pub mod config;
pub mod models;
pub mod oauth;
pub mod settings;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
