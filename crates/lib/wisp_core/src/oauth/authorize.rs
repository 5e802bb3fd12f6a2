//! Authorization redirect construction.

use tracing::debug;
use url::Url;

use super::OAuthError;
use crate::config::{ClientRegistration, ProviderEndpoints};

/// `response_type` for the authorization-code grant.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Build the provider consent-screen URL for `registration`.
///
/// Query parameters, in order: `client_id`, `redirect_uri`,
/// `response_type=code`, `scope` (space-joined, percent-encoded as `%20`),
/// `permissions`. Fails with [`OAuthError::Configuration`] when the client id
/// or callback address is blank, so no malformed redirect is ever produced.
pub fn authorize_url(
    registration: &ClientRegistration,
    endpoints: &ProviderEndpoints,
) -> Result<Url, OAuthError> {
    let missing = registration.missing_authorize_fields();
    if !missing.is_empty() {
        return Err(OAuthError::Configuration(format!(
            "missing {}",
            missing.join(", ")
        )));
    }

    let mut url = Url::parse(&endpoints.authorize_url).map_err(|e| {
        OAuthError::Configuration(format!(
            "invalid authorize endpoint '{}': {e}",
            endpoints.authorize_url
        ))
    })?;

    let scope = registration.scope_param();
    let params = [
        ("client_id", registration.client_id.as_str()),
        ("redirect_uri", registration.redirect_uri.as_str()),
        ("response_type", RESPONSE_TYPE_CODE),
        ("scope", scope.as_str()),
        ("permissions", registration.permissions.as_str()),
    ];
    // Built by hand: `query_pairs_mut` would form-encode spaces as `+`.
    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    url.set_query(Some(&query));

    debug!(url = %url, "built authorize redirect");
    Ok(url)
}
