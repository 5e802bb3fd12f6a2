//! Application error types.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use wisp_core::oauth::OAuthError;
use wisp_core::settings::SettingsError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub const MSG_CONFIGURATION: &str = "Server configuration error";
pub const MSG_MISSING_CODE: &str = "No authorization code provided";
pub const MSG_TOKEN_EXCHANGE: &str = "Failed to exchange authorization code";
pub const MSG_PROFILE_FETCH: &str = "Failed to fetch user data";
pub const MSG_INTERNAL: &str = "Internal server error";
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A collaborator service failed. The message is what the client sees.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error(transparent)]
    OAuth(#[from] OAuthError),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Map a Settings API failure for the operation described by `public`.
    ///
    /// Input errors pass their message through; everything else is logged and
    /// replaced by the generic `public` message.
    pub fn settings(err: SettingsError, public: &str) -> Self {
        match err {
            SettingsError::Validation(m) => AppError::Validation(m),
            other => {
                warn!(error = %other, "{public}");
                AppError::Upstream(public.to_string())
            }
        }
    }

    fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            AppError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.as_str()),
            AppError::Upstream(m) => (StatusCode::BAD_GATEWAY, m.as_str()),
            AppError::OAuth(e) => match e {
                OAuthError::MissingCode => (StatusCode::BAD_REQUEST, MSG_MISSING_CODE),
                OAuthError::Configuration(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_CONFIGURATION)
                }
                OAuthError::TokenExchange(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_TOKEN_EXCHANGE)
                }
                OAuthError::ProfileFetch(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_PROFILE_FETCH)
                }
            },
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// `CatchPanicLayer` handler: a panicking handler still answers with the
/// standard 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
