//! Settings API access.
//!
//! The Settings API is a separate service that owns per-guild bot
//! configuration. This module is its typed client plus the input checks the
//! dashboard applies before sending an update.

pub mod client;

use thiserror::Error;

pub use client::SettingsClient;

/// Longest command prefix the bot accepts.
pub const MAX_PREFIX_LEN: usize = 3;

/// Feature modules that can be toggled per guild.
pub const KNOWN_COGS: &[&str] = &[
    "admin",
    "moderation",
    "fun",
    "utility",
    "music",
    "economy",
    "welcome",
    "logging",
];

/// Errors talking to the Settings API.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Settings API request failed: {0}")]
    Request(String),

    #[error("Settings API returned {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Settings API response parse error: {0}")]
    Decode(String),
}

/// Trim and length-check a command prefix.
pub fn validate_prefix(prefix: &str) -> Result<String, SettingsError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(SettingsError::Validation("Prefix is required".into()));
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(SettingsError::Validation(format!(
            "Prefix must be {MAX_PREFIX_LEN} characters or less"
        )));
    }
    Ok(prefix.to_string())
}

/// Check every cog is known and drop repeats, keeping first-seen order.
pub fn validate_cogs(cogs: &[String]) -> Result<Vec<String>, SettingsError> {
    let mut out: Vec<String> = Vec::with_capacity(cogs.len());
    for cog in cogs {
        let cog = cog.trim().to_lowercase();
        if !KNOWN_COGS.contains(&cog.as_str()) {
            return Err(SettingsError::Validation(format!("Unknown cog: {cog}")));
        }
        if !out.contains(&cog) {
            out.push(cog);
        }
    }
    Ok(out)
}

/// `None` (or blank) clears the log channel; anything else must be an id.
pub fn validate_log_channel(channel_id: Option<&str>) -> Result<Option<String>, SettingsError> {
    match channel_id.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) if id.chars().all(|c| c.is_ascii_digit()) => Ok(Some(id.to_string())),
        Some(id) => Err(SettingsError::Validation(format!(
            "Invalid channel id: {id}"
        ))),
    }
}
