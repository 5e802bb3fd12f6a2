//! Dashboard configuration.
//!
//! Read once at process start and shared read-only by every handler. Nothing
//! in here is mutated after construction.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Callback address used when `DISCORD_REDIRECT_URI` is not set.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/auth/discord/callback";
/// Scope requested when `DISCORD_SCOPE` is not set, in request order.
pub const DEFAULT_SCOPE: &[&str] = &["identify", "guilds", "guilds.members.read", "bot"];
/// Administrator bot permission bitmask.
pub const DEFAULT_PERMISSIONS: &str = "8";
/// Base URL of the Settings API when `SETTINGS_API_URL` is not set.
pub const DEFAULT_SETTINGS_API_URL: &str = "http://localhost:8888/api";
/// Outbound request timeout when `OUTBOUND_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

pub const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";
pub const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
pub const DISCORD_API_BASE_URL: &str = "https://discord.com/api";
/// Discord's image CDN, for avatar URLs.
pub const DISCORD_CDN_URL: &str = "https://cdn.discordapp.com";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// =============================================================================
// Client registration
// =============================================================================

/// The application's registration with the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect registered with the provider exactly.
    pub redirect_uri: String,
    pub scope: Vec<String>,
    /// Bot permission bitmask, as a decimal string.
    pub permissions: String,
}

impl ClientRegistration {
    /// Scope list as sent on the wire: space-joined, configured order.
    pub fn scope_param(&self) -> String {
        self.scope.join(" ")
    }

    /// Settings the authorize redirect cannot be built without.
    pub fn missing_authorize_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        if self.redirect_uri.trim().is_empty() {
            missing.push("redirect_uri");
        }
        missing
    }

    /// Settings the code exchange cannot run without.
    pub fn missing_exchange_fields(&self) -> Vec<&'static str> {
        let mut missing = self.missing_authorize_fields();
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        missing
    }
}

impl fmt::Debug for ClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistration")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("permissions", &self.permissions)
            .finish()
    }
}

// =============================================================================
// Provider endpoints
// =============================================================================

/// Identity provider endpoints. Defaults to Discord.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    /// REST base, without a trailing slash (e.g. `https://discord.com/api`).
    pub api_base_url: String,
}

impl ProviderEndpoints {
    /// Endpoints rooted at a single base URL, as a mock server exposes them.
    pub fn at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize_url: format!("{base}/oauth2/authorize"),
            token_url: format!("{base}/oauth2/token"),
            api_base_url: base.to_string(),
        }
    }

    /// The provider's "current user" endpoint.
    pub fn current_user_url(&self) -> String {
        format!("{}/users/@me", self.api_base_url.trim_end_matches('/'))
    }
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: DISCORD_AUTHORIZE_URL.to_string(),
            token_url: DISCORD_TOKEN_URL.to_string(),
            api_base_url: DISCORD_API_BASE_URL.to_string(),
        }
    }
}

// =============================================================================
// Dashboard configuration
// =============================================================================

/// Full process configuration.
#[derive(Clone)]
pub struct DashboardConfig {
    pub registration: ClientRegistration,
    pub endpoints: ProviderEndpoints,
    /// Used by the Settings API collaborator, not by the login flow.
    pub bot_token: Option<String>,
    pub settings_api_url: String,
    /// Applied to every outbound request.
    pub request_timeout: Duration,
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("registration", &self.registration)
            .field("endpoints", &self.endpoints)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("settings_api_url", &self.settings_api_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl DashboardConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                 | Default                                        |
    /// |--------------------------|------------------------------------------------|
    /// | `DISCORD_CLIENT_ID`      | required                                       |
    /// | `DISCORD_CLIENT_SECRET`  | required                                       |
    /// | `DISCORD_BOT_TOKEN`      | required                                       |
    /// | `DISCORD_REDIRECT_URI`   | `http://localhost:8888/auth/discord/callback`  |
    /// | `DISCORD_SCOPE`          | `identify guilds guilds.members.read bot`      |
    /// | `DISCORD_PERMISSIONS`    | `8`                                            |
    /// | `DISCORD_AUTHORIZE_URL`  | `https://discord.com/api/oauth2/authorize`     |
    /// | `DISCORD_TOKEN_URL`      | `https://discord.com/api/oauth2/token`         |
    /// | `DISCORD_API_BASE_URL`   | `https://discord.com/api`                      |
    /// | `SETTINGS_API_URL`       | `http://localhost:8888/api`                    |
    /// | `OUTBOUND_TIMEOUT_SECS`  | `5`                                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("DISCORD_CLIENT_ID");
        let client_secret = get("DISCORD_CLIENT_SECRET");
        let bot_token = get("DISCORD_BOT_TOKEN");

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("DISCORD_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("DISCORD_CLIENT_SECRET");
        }
        if bot_token.is_none() {
            missing.push("DISCORD_BOT_TOKEN");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let redirect_uri =
            get("DISCORD_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        let scope = match get("DISCORD_SCOPE") {
            Some(raw) => parse_scope(&raw)?,
            None => DEFAULT_SCOPE.iter().map(|s| s.to_string()).collect(),
        };
        let permissions = match get("DISCORD_PERMISSIONS") {
            Some(raw) => parse_permissions(&raw)?,
            None => DEFAULT_PERMISSIONS.to_string(),
        };
        let request_timeout = match get("OUTBOUND_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let defaults = ProviderEndpoints::default();
        let endpoints = ProviderEndpoints {
            authorize_url: get("DISCORD_AUTHORIZE_URL").unwrap_or(defaults.authorize_url),
            token_url: get("DISCORD_TOKEN_URL").unwrap_or(defaults.token_url),
            api_base_url: get("DISCORD_API_BASE_URL").unwrap_or(defaults.api_base_url),
        };

        let config = Self {
            registration: ClientRegistration {
                client_id: client_id.unwrap_or_default(),
                client_secret: client_secret.unwrap_or_default(),
                redirect_uri,
                scope,
                permissions,
            },
            endpoints,
            bot_token,
            settings_api_url: get("SETTINGS_API_URL")
                .unwrap_or_else(|| DEFAULT_SETTINGS_API_URL.to_string()),
            request_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks a fully built configuration. Called by `from_lookup`, and again
    /// by the server binary for configurations assembled from CLI flags.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let missing: Vec<&'static str> = self
            .registration
            .missing_exchange_fields()
            .into_iter()
            .map(|field| match field {
                "client_id" => "DISCORD_CLIENT_ID",
                "client_secret" => "DISCORD_CLIENT_SECRET",
                _ => "DISCORD_REDIRECT_URI",
            })
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        check_url("DISCORD_REDIRECT_URI", &self.registration.redirect_uri)?;
        check_url("DISCORD_AUTHORIZE_URL", &self.endpoints.authorize_url)?;
        check_url("DISCORD_TOKEN_URL", &self.endpoints.token_url)?;
        check_url("DISCORD_API_BASE_URL", &self.endpoints.api_base_url)?;
        check_url("SETTINGS_API_URL", &self.settings_api_url)?;

        if self.registration.scope.is_empty() {
            return Err(ConfigError::Invalid {
                name: "DISCORD_SCOPE",
                reason: "at least one scope is required".into(),
            });
        }
        parse_permissions(&self.registration.permissions)?;
        Ok(())
    }
}

/// Splits a scope list on whitespace or commas, keeping the given order.
pub fn parse_scope(raw: &str) -> Result<Vec<String>, ConfigError> {
    let scope: Vec<String> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if scope.is_empty() {
        return Err(ConfigError::Invalid {
            name: "DISCORD_SCOPE",
            reason: "at least one scope is required".into(),
        });
    }
    Ok(scope)
}

/// Accepts a decimal permission bitmask and returns it normalized.
pub fn parse_permissions(raw: &str) -> Result<String, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(|bits| bits.to_string())
        .map_err(|e| ConfigError::Invalid {
            name: "DISCORD_PERMISSIONS",
            reason: format!("expected an unsigned integer bitmask ({e})"),
        })
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::Invalid {
            name: "OUTBOUND_TIMEOUT_SECS",
            reason: format!("expected a positive number of seconds, got '{raw}'"),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
    }
}

fn check_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value).map(|_| ()).map_err(|e| ConfigError::Invalid {
        name,
        reason: format!("'{value}' is not an absolute URL ({e})"),
    })
}
