//! Session status and logout.

use axum::Extension;
use axum::Json;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::info;
use wisp_core::config::DISCORD_CDN_URL;
use wisp_core::models::auth::UserProfile;

use super::found;
use crate::error::AppResult;
use crate::middleware::session::{DashboardSession, session_from_jar};
use crate::services::cookies;

/// Where logout sends the browser.
pub const LOGOUT_REDIRECT: &str = "/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserProfile,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// `GET /auth/session`: the logged-in user, for the dashboard header.
pub async fn session_handler(
    Extension(session): Extension<DashboardSession>,
) -> Json<SessionResponse> {
    let display_name = session.user.display_name().to_string();
    let avatar_url = session.user.avatar_url(DISCORD_CDN_URL);
    Json(SessionResponse {
        user: session.user,
        display_name,
        avatar_url,
    })
}

/// `GET|POST /auth/logout`: clear the session cookies and go home.
pub async fn logout_handler(jar: CookieJar) -> AppResult<Response> {
    if let Some(session) = session_from_jar(&jar) {
        info!(user_id = %session.user.id, "user logged out");
    }
    let redirect = found(LOGOUT_REDIRECT)?;
    Ok((cookies::without_session(CookieJar::new()), redirect).into_response())
}
