//! Request handlers.

pub mod guilds;
pub mod health;
pub mod oauth;
pub mod session;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::error::{AppError, AppResult};

/// A `302 Found` to `location`. `axum::response::Redirect` only offers
/// 303/307/308.
pub(crate) fn found(location: &str) -> AppResult<Response> {
    let value = HeaderValue::try_from(location)
        .map_err(|_| AppError::Internal(format!("invalid redirect target: {location:?}")))?;
    let mut resp = StatusCode::FOUND.into_response();
    resp.headers_mut().insert(header::LOCATION, value);
    Ok(resp)
}
