//! # wisp_api
//!
//! HTTP API library for the Wisp dashboard: Discord login, session cookies,
//! and the guild settings endpoints the dashboard UI calls.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use wisp_core::oauth::{DiscordProvider, IdentityProvider};
use wisp_core::settings::SettingsClient;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{guilds, health, oauth, session};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration. Read-only after startup.
    pub config: Arc<ApiConfig>,
    /// Token exchange and current-user lookup.
    pub provider: Arc<dyn IdentityProvider>,
    /// Settings API client.
    pub settings: SettingsClient,
}

impl AppState {
    /// Production state: Discord provider and Settings API client sharing the
    /// configured outbound timeout.
    pub fn from_config(config: ApiConfig) -> Result<Self, AppError> {
        let timeout = config.dashboard.request_timeout;
        let provider = DiscordProvider::new(config.dashboard.endpoints.clone(), timeout)?;
        let settings = SettingsClient::new(&config.dashboard.settings_api_url, timeout)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
            settings,
        })
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Public routes (no session required)
    let public = Router::new()
        .route(routes::GET_AUTH_DISCORD, get(oauth::authorize_handler))
        .route(routes::GET_LOGIN, get(oauth::authorize_handler))
        .route(routes::GET_AUTH_DISCORD_CALLBACK, get(oauth::callback_handler))
        .route(
            routes::AUTH_LOGOUT,
            get(session::logout_handler).post(session::logout_handler),
        )
        .route(routes::GET_API_HEALTH, get(health::health_handler));

    // Session routes (require the login cookies)
    let protected = Router::new()
        .route(routes::GET_AUTH_SESSION, get(session::session_handler))
        .route(routes::GET_API_GUILDS, get(guilds::list_guilds_handler))
        .route(routes::GET_API_GUILD, get(guilds::guild_settings_handler))
        .route(routes::GET_API_GUILD_CHANNELS, get(guilds::guild_channels_handler))
        .route(routes::GET_API_GUILD_ACTIVITY, get(guilds::guild_activity_handler))
        .route(routes::POST_API_GUILD_PREFIX, post(guilds::update_prefix_handler))
        .route(routes::POST_API_GUILD_COGS, post(guilds::update_cogs_handler))
        .route(
            routes::POST_API_GUILD_LOG_CHANNEL,
            post(guilds::update_log_channel_handler),
        )
        .layer(axum::middleware::from_fn(middleware::session::require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
