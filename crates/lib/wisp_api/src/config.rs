//! API server configuration.

use std::env;

use axum::http::HeaderValue;
use wisp_core::config::{ConfigError, DashboardConfig};

/// Where a completed login lands.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8888").
    pub bind_addr: String,
    /// OAuth client registration, provider endpoints, Settings API location.
    pub dashboard: DashboardConfig,
    /// Redirect target after a successful login.
    pub landing_path: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable       | Default          |
    /// |----------------|------------------|
    /// | `BIND_ADDR`    | `127.0.0.1:8888` |
    /// | `LANDING_PATH` | `/dashboard`     |
    ///
    /// plus everything [`DashboardConfig::from_env`] reads.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8888".into()),
            dashboard: DashboardConfig::from_env()?,
            landing_path: env::var("LANDING_PATH")
                .unwrap_or_else(|_| DEFAULT_LANDING_PATH.into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the dashboard settings and the landing path. Run again after
    /// CLI overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dashboard.validate()?;
        check_landing_path(&self.landing_path)
    }
}

/// The landing path must be an absolute path usable as a `Location` header.
pub fn check_landing_path(path: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        name: "LANDING_PATH",
        reason: format!("'{}' {reason}", path.escape_debug()),
    };
    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    HeaderValue::try_from(path).map_err(|_| invalid("is not a valid header value"))?;
    Ok(())
}
