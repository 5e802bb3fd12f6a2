//! Discord login handlers: the authorize redirect and the OAuth2 callback.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{info, warn};
use wisp_core::oauth::{self, OAuthError};

use super::found;
use crate::AppState;
use crate::error::AppResult;
use crate::services::cookies;

/// Query parameters the provider redirects back with.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set instead of `code` when the user declines consent.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /auth/discord`: redirect to the Discord consent screen.
///
/// 302 with `Cache-Control: no-cache`, or a 500 JSON error if the client
/// registration is incomplete.
pub async fn authorize_handler(State(state): State<AppState>) -> AppResult<Response> {
    let dashboard = &state.config.dashboard;
    let url = oauth::authorize_url(&dashboard.registration, &dashboard.endpoints)?;

    info!(client_id = %dashboard.registration.client_id, "redirecting to Discord authorization");

    let mut resp = found(url.as_str())?;
    resp.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(resp)
}

/// `GET /auth/discord/callback`: exchange the code, fetch the user, set the
/// session cookies, and redirect to the dashboard.
///
/// Cookies are only attached once both outbound calls have succeeded and the
/// redirect is built; every failure is a JSON error response. A query string
/// that does not parse (e.g. a repeated `code`) counts as no code.
pub async fn callback_handler(
    State(state): State<AppState>,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> AppResult<Response> {
    let Query(params) = query.map_err(|rejection| {
        warn!(error = %rejection, "unparseable callback query");
        OAuthError::MissingCode
    })?;

    if let Some(error) = params.error.as_deref() {
        warn!(
            error,
            description = params.error_description.as_deref().unwrap_or_default(),
            "provider redirected back with an error"
        );
    }

    let session = oauth::complete_login(
        state.provider.as_ref(),
        &state.config.dashboard.registration,
        params.code.as_deref(),
    )
    .await?;

    let redirect = found(&state.config.landing_path)?;
    let jar = cookies::with_session(CookieJar::new(), &session)?;
    Ok((jar, redirect).into_response())
}
