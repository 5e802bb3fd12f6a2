//! Identity provider client: token exchange and current-user lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, error};

use super::OAuthError;
use crate::config::{ClientRegistration, ProviderEndpoints};
use crate::models::auth::{TokenPair, UserProfile};

/// `grant_type` for exchanging an authorization code.
pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";

/// The two outbound calls the callback pipeline makes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange a one-time authorization code for a token pair.
    async fn exchange_code(
        &self,
        registration: &ClientRegistration,
        code: &str,
    ) -> Result<TokenPair, OAuthError>;

    /// Fetch the profile of the user the access token belongs to.
    async fn fetch_current_user(&self, access_token: &str) -> Result<UserProfile, OAuthError>;
}

// =============================================================================
// Discord
// =============================================================================

/// Raw token endpoint response. `refresh_token` is optional on the wire but
/// required for a session.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: Option<u64>,
    refresh_token: Option<String>,
    scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Discord OAuth2 over reqwest. Every request is bounded by the client timeout.
#[derive(Clone, Debug)]
pub struct DiscordProvider {
    client: Client,
    endpoints: ProviderEndpoints,
}

impl DiscordProvider {
    /// Build a provider with its own HTTP client and request timeout.
    pub fn new(endpoints: ProviderEndpoints, timeout: Duration) -> Result<Self, OAuthError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthError::Configuration(format!("HTTP client setup failed: {e}")))?;
        Ok(Self::with_client(client, endpoints))
    }

    /// Build a provider on an existing client. The client's timeout applies.
    pub fn with_client(client: Client, endpoints: ProviderEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl IdentityProvider for DiscordProvider {
    async fn exchange_code(
        &self,
        registration: &ClientRegistration,
        code: &str,
    ) -> Result<TokenPair, OAuthError> {
        let missing = registration.missing_exchange_fields();
        if !missing.is_empty() {
            return Err(OAuthError::Configuration(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        let params = [
            ("client_id", registration.client_id.as_str()),
            ("client_secret", registration.client_secret.as_str()),
            ("code", code),
            ("grant_type", GRANT_AUTHORIZATION_CODE),
            ("redirect_uri", registration.redirect_uri.as_str()),
        ];

        let resp = self
            .client
            .post(&self.endpoints.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::TokenExchange(describe_send_error(&e)))?;

        let resp = ensure_success(resp, "token exchange")
            .await
            .map_err(OAuthError::TokenExchange)?;

        let body: TokenResponse = resp
            .json()
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("token response parse error: {e}")))?;

        let refresh_token = body.refresh_token.ok_or_else(|| {
            OAuthError::TokenExchange("token response has no refresh_token".to_string())
        })?;

        debug!(expires_in = ?body.expires_in, scope = ?body.scope, "token exchange succeeded");

        Ok(TokenPair {
            access_token: body.access_token,
            refresh_token,
            token_type: body.token_type,
            expires_in: body.expires_in,
            scope: body.scope,
        })
    }

    async fn fetch_current_user(&self, access_token: &str) -> Result<UserProfile, OAuthError> {
        let resp = self
            .client
            .get(self.endpoints.current_user_url())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthError::ProfileFetch(describe_send_error(&e)))?;

        let resp = ensure_success(resp, "profile fetch")
            .await
            .map_err(OAuthError::ProfileFetch)?;

        resp.json::<UserProfile>()
            .await
            .map_err(|e| OAuthError::ProfileFetch(format!("user response parse error: {e}")))
    }
}

/// Pass 2xx responses through; log and describe anything else.
async fn ensure_success(resp: Response, step: &str) -> Result<Response, String> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    error!(%status, body = %body, "{step} rejected by provider");
    Err(format!("HTTP {status}"))
}

fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else {
        format!("request failed: {e}")
    }
}
