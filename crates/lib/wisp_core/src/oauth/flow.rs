//! The callback pipeline.
//!
//! validate → exchange → profile fetch → session. Strictly sequential, first
//! failure wins. No retries; authorization codes are single-use.

use tracing::info;

use super::OAuthError;
use super::provider::IdentityProvider;
use crate::config::ClientRegistration;
use crate::models::auth::AuthenticatedSession;

/// Reject absent, empty, and whitespace-only codes. An accepted code is
/// returned exactly as received.
pub fn validate_code(code: Option<&str>) -> Result<&str, OAuthError> {
    match code {
        Some(code) if !code.trim().is_empty() => Ok(code),
        _ => Err(OAuthError::MissingCode),
    }
}

/// Run the callback pipeline for the `code` query parameter.
///
/// The profile fetch is only attempted after a successful exchange, and an
/// [`AuthenticatedSession`] only exists when both calls succeeded.
pub async fn complete_login(
    provider: &dyn IdentityProvider,
    registration: &ClientRegistration,
    code: Option<&str>,
) -> Result<AuthenticatedSession, OAuthError> {
    let code = validate_code(code)?;

    let tokens = provider.exchange_code(registration, code).await?;
    let profile = provider.fetch_current_user(&tokens.access_token).await?;

    info!(user_id = %profile.id, username = %profile.username, "user authenticated");
    Ok(AuthenticatedSession { profile, tokens })
}
