//! Route paths served by the dashboard backend.

pub const GET_AUTH_DISCORD: &str = "/auth/discord";
pub const GET_AUTH_DISCORD_CALLBACK: &str = "/auth/discord/callback";
pub const GET_LOGIN: &str = "/login";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const GET_AUTH_SESSION: &str = "/auth/session";
pub const GET_API_HEALTH: &str = "/api/health";

pub const GET_API_GUILDS: &str = "/api/guilds";
pub const GET_API_GUILD: &str = "/api/guilds/{id}";
pub const GET_API_GUILD_CHANNELS: &str = "/api/guilds/{id}/channels";
pub const GET_API_GUILD_ACTIVITY: &str = "/api/guilds/{id}/activity";
pub const POST_API_GUILD_PREFIX: &str = "/api/guilds/{id}/prefix";
pub const POST_API_GUILD_COGS: &str = "/api/guilds/{id}/cogs";
pub const POST_API_GUILD_LOG_CHANNEL: &str = "/api/guilds/{id}/log-channel";
