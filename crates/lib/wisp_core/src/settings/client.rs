//! HTTP client for the Settings API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{SettingsError, validate_cogs, validate_log_channel, validate_prefix};
use crate::models::guild::{
    ActivityEntry, Channel, CogsUpdate, Guild, GuildSettings, LogChannelUpdate, PrefixUpdate,
};

/// Typed wrapper over the Settings API endpoints.
///
/// Every call is made on behalf of a logged-in administrator and carries
/// their access token as a bearer credential.
#[derive(Clone, Debug)]
pub struct SettingsClient {
    client: Client,
    base_url: String,
}

impl SettingsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SettingsError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SettingsError::Request(format!("HTTP client setup failed: {e}")))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// `GET /guilds`
    pub async fn list_guilds(&self, access_token: &str) -> Result<Vec<Guild>, SettingsError> {
        self.get_json("/guilds", access_token).await
    }

    /// `GET /guild/{id}`
    pub async fn guild_settings(
        &self,
        guild_id: &str,
        access_token: &str,
    ) -> Result<GuildSettings, SettingsError> {
        self.get_json(&format!("/guild/{}", encode_id(guild_id)), access_token)
            .await
    }

    /// `GET /guild/{id}/channels`
    pub async fn guild_channels(
        &self,
        guild_id: &str,
        access_token: &str,
    ) -> Result<Vec<Channel>, SettingsError> {
        self.get_json(
            &format!("/guild/{}/channels", encode_id(guild_id)),
            access_token,
        )
        .await
    }

    /// `GET /guild/{id}/activity`
    pub async fn guild_activity(
        &self,
        guild_id: &str,
        access_token: &str,
    ) -> Result<Vec<ActivityEntry>, SettingsError> {
        self.get_json(
            &format!("/guild/{}/activity", encode_id(guild_id)),
            access_token,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// `POST /guild/{id}/prefix`. Returns the prefix that was sent.
    pub async fn update_prefix(
        &self,
        guild_id: &str,
        prefix: &str,
        access_token: &str,
    ) -> Result<String, SettingsError> {
        let prefix = validate_prefix(prefix)?;
        let body = PrefixUpdate {
            prefix: prefix.clone(),
        };
        self.post_json(
            &format!("/guild/{}/prefix", encode_id(guild_id)),
            &body,
            access_token,
        )
        .await?;
        Ok(prefix)
    }

    /// `POST /guild/{id}/cogs`. Returns the cog list that was sent.
    pub async fn update_cogs(
        &self,
        guild_id: &str,
        cogs: &[String],
        access_token: &str,
    ) -> Result<Vec<String>, SettingsError> {
        let cogs = validate_cogs(cogs)?;
        let body = CogsUpdate { cogs: cogs.clone() };
        self.post_json(
            &format!("/guild/{}/cogs", encode_id(guild_id)),
            &body,
            access_token,
        )
        .await?;
        Ok(cogs)
    }

    /// `POST /guild/{id}/log-channel`. `None` clears the channel.
    pub async fn update_log_channel(
        &self,
        guild_id: &str,
        channel_id: Option<&str>,
        access_token: &str,
    ) -> Result<Option<String>, SettingsError> {
        let channel_id = validate_log_channel(channel_id)?;
        let body = LogChannelUpdate {
            channel_id: channel_id.clone(),
        };
        self.post_json(
            &format!("/guild/{}/log-channel", encode_id(guild_id)),
            &body,
            access_token,
        )
        .await?;
        Ok(channel_id)
    }

    // -------------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<T, SettingsError> {
        let resp = self
            .send(self.client.get(self.url(path)), path, access_token)
            .await?;
        resp.json::<T>()
            .await
            .map_err(|e| SettingsError::Decode(format!("{path}: {e}")))
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        access_token: &str,
    ) -> Result<(), SettingsError> {
        self.send(self.client.post(self.url(path)).json(body), path, access_token)
            .await?;
        Ok(())
    }

    /// Send with bearer auth; non-2xx becomes [`SettingsError::Status`]. The
    /// error body is logged, never returned.
    async fn send(
        &self,
        request: RequestBuilder,
        path: &str,
        access_token: &str,
    ) -> Result<reqwest::Response, SettingsError> {
        let resp = request
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SettingsError::Request(format!("{path}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, endpoint = %path, body = %body, "settings API call failed");
            return Err(SettingsError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        debug!(%status, endpoint = %path, "settings API call succeeded");
        Ok(resp)
    }
}

fn encode_id(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
