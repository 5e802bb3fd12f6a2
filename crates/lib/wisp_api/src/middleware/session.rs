//! Session middleware: reads the login cookies and rejects requests without
//! them.

use axum::{extract::Request, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;
use wisp_core::models::auth::UserProfile;

use crate::error::{AppError, MSG_NOT_AUTHENTICATED};
use crate::services::cookies::{ACCESS_COOKIE, USER_COOKIE, decode_user_cookie};

/// The logged-in administrator, stored in request extensions.
///
/// `user` is display data only; the Settings API authorizes requests by the
/// access token, not by this profile.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    pub user: UserProfile,
    pub access_token: String,
}

/// Axum middleware: requires the `user` and `access_token` cookies and
/// injects `DashboardSession` into request extensions.
pub async fn require_session(
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_from_jar(&jar)
        .ok_or_else(|| AppError::Unauthorized(MSG_NOT_AUTHENTICATED.into()))?;

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Both cookies present and the profile decodes.
pub fn session_from_jar(jar: &CookieJar) -> Option<DashboardSession> {
    let access_token = jar
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())?;
    let user = jar.get(USER_COOKIE).and_then(|c| decode_user_cookie(c.value()))?;
    Some(DashboardSession { user, access_token })
}
