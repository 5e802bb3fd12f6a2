//! Domain models shared by the login flow and the Settings API client.

pub mod auth;
pub mod guild;
