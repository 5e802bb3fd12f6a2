//! Discord OAuth2 authorization-code flow.
//!
//! Two halves:
//!
//! - [`authorize::authorize_url`] builds the consent-screen redirect.
//! - [`flow::complete_login`] runs the callback pipeline: validate the code,
//!   exchange it for tokens, fetch the user, hand back an
//!   [`AuthenticatedSession`](crate::models::auth::AuthenticatedSession).
//!
//! Outbound calls go through the [`provider::IdentityProvider`] trait; the
//! reqwest-backed [`provider::DiscordProvider`] is the production one.

pub mod authorize;
pub mod flow;
pub mod provider;

use thiserror::Error;

pub use authorize::authorize_url;
pub use flow::{complete_login, validate_code};
pub use provider::{DiscordProvider, IdentityProvider};

/// Failures of the login flow, one per pipeline step.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Client registration is incomplete or unusable.
    #[error("OAuth configuration error: {0}")]
    Configuration(String),

    /// The callback arrived without an authorization code.
    #[error("No authorization code provided")]
    MissingCode,

    /// The token endpoint refused the code, timed out, or sent garbage.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// The current-user endpoint refused the token, timed out, or sent garbage.
    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),
}
