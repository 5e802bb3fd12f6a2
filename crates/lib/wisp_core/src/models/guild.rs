//! Settings API models: guilds, per-guild settings, channels, activity.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Discord channel type for guild text channels.
pub const TEXT_CHANNEL: u8 = 0;

/// Prefix the bot answers to when a guild has not set one.
pub const DEFAULT_PREFIX: &str = "?";

/// A guild the administrator can manage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Per-guild bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Enabled feature modules.
    #[serde(default)]
    pub cogs: Vec<String>,
    #[serde(default, alias = "security_log_channel")]
    pub log_channel: Option<String>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for GuildSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            cogs: Vec::new(),
            log_channel: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: u8,
}

impl Channel {
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_CHANNEL
    }
}

/// Keeps only the channels a log channel can be chosen from.
pub fn text_channels(channels: &[Channel]) -> Vec<Channel> {
    channels.iter().filter(|c| c.is_text()).cloned().collect()
}

/// One entry of a guild's recent-activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps and zone-less ISO timestamps (read as UTC).
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

// Request bodies for the Settings API update endpoints.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixUpdate {
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CogsUpdate {
    pub cogs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogChannelUpdate {
    /// `None` clears the log channel.
    pub channel_id: Option<String>,
}
