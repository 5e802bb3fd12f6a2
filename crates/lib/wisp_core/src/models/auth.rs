//! Login flow models: token pair, user profile, authenticated session.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tokens issued by a successful authorization-code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds, when the provider reports it.
    pub expires_in: Option<u64>,
    /// Scope actually granted, space-separated.
    pub scope: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The provider's "current user" record.
///
/// Fields the dashboard does not use are kept in `extra` so the profile
/// serializes back to what the provider sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Name to greet the user with: display name if set, else username.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }

    /// CDN URL of the user's avatar, if they have one.
    pub fn avatar_url(&self, cdn_base: &str) -> Option<String> {
        self.avatar.as_ref().map(|hash| {
            format!(
                "{}/avatars/{}/{}.png",
                cdn_base.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }
}

/// Outcome of a completed login: both the tokens and the profile.
///
/// Only constructed once every step of the callback pipeline has succeeded.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub profile: UserProfile,
    pub tokens: TokenPair,
}
