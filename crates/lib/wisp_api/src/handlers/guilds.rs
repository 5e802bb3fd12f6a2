//! Guild settings proxy: the dashboard UI calls these, they call the Settings
//! API with the administrator's access token.

use axum::Extension;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;
use wisp_core::models::guild::{
    ActivityEntry, Channel, CogsUpdate, Guild, GuildSettings, LogChannelUpdate, PrefixUpdate,
    text_channels,
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::session::DashboardSession;

pub const MSG_LIST_GUILDS: &str = "Failed to fetch servers";
pub const MSG_GUILD_SETTINGS: &str = "Failed to fetch guild settings";
pub const MSG_GUILD_CHANNELS: &str = "Failed to fetch channels";
pub const MSG_GUILD_ACTIVITY: &str = "Failed to fetch activity";
pub const MSG_UPDATE_PREFIX: &str = "Failed to update prefix";
pub const MSG_UPDATE_COGS: &str = "Failed to update features";
pub const MSG_UPDATE_LOG_CHANNEL: &str = "Failed to update log channel";

#[derive(Debug, Default, Deserialize)]
pub struct ChannelQuery {
    /// Only return text channels (log channel picker).
    #[serde(default)]
    pub text_only: bool,
}

#[derive(Debug, Serialize)]
pub struct PrefixUpdated {
    pub success: bool,
    pub prefix: String,
}

#[derive(Debug, Serialize)]
pub struct CogsUpdated {
    pub success: bool,
    pub cogs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LogChannelUpdated {
    pub success: bool,
    pub channel_id: Option<String>,
}

/// `GET /api/guilds`
pub async fn list_guilds_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
) -> AppResult<Json<Vec<Guild>>> {
    let guilds = state
        .settings
        .list_guilds(&session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_LIST_GUILDS))?;
    Ok(Json(guilds))
}

/// `GET /api/guilds/{id}`
pub async fn guild_settings_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
) -> AppResult<Json<GuildSettings>> {
    let settings = state
        .settings
        .guild_settings(&guild_id, &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_GUILD_SETTINGS))?;
    Ok(Json(settings))
}

/// `GET /api/guilds/{id}/channels[?text_only=true]`
pub async fn guild_channels_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
    Query(query): Query<ChannelQuery>,
) -> AppResult<Json<Vec<Channel>>> {
    let channels = state
        .settings
        .guild_channels(&guild_id, &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_GUILD_CHANNELS))?;
    if query.text_only {
        return Ok(Json(text_channels(&channels)));
    }
    Ok(Json(channels))
}

/// `GET /api/guilds/{id}/activity`
pub async fn guild_activity_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
) -> AppResult<Json<Vec<ActivityEntry>>> {
    let activity = state
        .settings
        .guild_activity(&guild_id, &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_GUILD_ACTIVITY))?;
    Ok(Json(activity))
}

/// `POST /api/guilds/{id}/prefix`
pub async fn update_prefix_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
    Json(body): Json<PrefixUpdate>,
) -> AppResult<Json<PrefixUpdated>> {
    let prefix = state
        .settings
        .update_prefix(&guild_id, &body.prefix, &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_UPDATE_PREFIX))?;
    info!(guild_id = %guild_id, user_id = %session.user.id, %prefix, "prefix updated");
    Ok(Json(PrefixUpdated {
        success: true,
        prefix,
    }))
}

/// `POST /api/guilds/{id}/cogs`
pub async fn update_cogs_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
    Json(body): Json<CogsUpdate>,
) -> AppResult<Json<CogsUpdated>> {
    let cogs = state
        .settings
        .update_cogs(&guild_id, &body.cogs, &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_UPDATE_COGS))?;
    info!(guild_id = %guild_id, user_id = %session.user.id, ?cogs, "features updated");
    Ok(Json(CogsUpdated {
        success: true,
        cogs,
    }))
}

/// `POST /api/guilds/{id}/log-channel`. A null or blank `channel_id` clears it.
pub async fn update_log_channel_handler(
    State(state): State<AppState>,
    Extension(session): Extension<DashboardSession>,
    Path(guild_id): Path<String>,
    Json(body): Json<LogChannelUpdate>,
) -> AppResult<Json<LogChannelUpdated>> {
    let channel_id = state
        .settings
        .update_log_channel(&guild_id, body.channel_id.as_deref(), &session.access_token)
        .await
        .map_err(|e| AppError::settings(e, MSG_UPDATE_LOG_CHANNEL))?;
    info!(guild_id = %guild_id, user_id = %session.user.id, ?channel_id, "log channel updated");
    Ok(Json(LogChannelUpdated {
        success: true,
        channel_id,
    }))
}
