//! Cookie service: build, read and clear the login session cookies.
//!
//! The session is three cookies: `user` (the provider profile as
//! base64url-encoded JSON), `access_token`, and `refresh_token`. All are
//! `HttpOnly; Secure; SameSite=Lax; Path=/` with no `Max-Age`, so they last
//! as long as the browser session.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::Duration;
use wisp_core::models::auth::{AuthenticatedSession, UserProfile};

use crate::error::{AppError, AppResult};

/// Cookie name for the user profile.
pub const USER_COOKIE: &str = "user";
/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

const SESSION_COOKIES: [&str; 3] = [USER_COOKIE, ACCESS_COOKIE, REFRESH_COOKIE];

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Build the `user` cookie. JSON is not a valid cookie value as-is, so it is
/// base64url-encoded.
pub fn user_cookie(profile: &UserProfile) -> AppResult<Cookie<'static>> {
    let json = serde_json::to_vec(profile)
        .map_err(|e| AppError::Internal(format!("profile serialization failed: {e}")))?;
    Ok(session_cookie(USER_COOKIE, URL_SAFE_NO_PAD.encode(json)))
}

/// Build the `access_token` cookie.
pub fn access_cookie(token: &str) -> Cookie<'static> {
    session_cookie(ACCESS_COOKIE, token.to_string())
}

/// Build the `refresh_token` cookie.
pub fn refresh_cookie(token: &str) -> Cookie<'static> {
    session_cookie(REFRESH_COOKIE, token.to_string())
}

/// Add all three session cookies to `jar`. Takes a complete session, so a
/// jar never ends up with only part of one.
pub fn with_session(jar: CookieJar, session: &AuthenticatedSession) -> AppResult<CookieJar> {
    let user = user_cookie(&session.profile)?;
    Ok(jar
        .add(user)
        .add(access_cookie(&session.tokens.access_token))
        .add(refresh_cookie(&session.tokens.refresh_token)))
}

/// Build an expired cookie that clears `name`.
pub fn clear_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// Add expired versions of all three session cookies to `jar`.
pub fn without_session(jar: CookieJar) -> CookieJar {
    SESSION_COOKIES
        .into_iter()
        .fold(jar, |jar, name| jar.add(clear_cookie(name)))
}

/// Decode a `user` cookie value. `None` if it is not one we issued.
pub fn decode_user_cookie(value: &str) -> Option<UserProfile> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}
