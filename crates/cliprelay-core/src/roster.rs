//! Client for the external device-management service.
//!
//! The service owns the roster: which transmitters and receivers exist and
//! which console location each belongs to. Cliprelay only ever reads it,
//! through three operations: authenticate, list devices, list channels.

use async_trait::async_trait;
use cliprelay_types::Device;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{RelayError, Result};

/// Login credentials for the roster service.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Filter for the channel lookup endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelFilter {
    pub device_type: String,
    pub filter_c_description: String,
}

impl ChannelFilter {
    /// Filter for the transmitting channel attached to a named computer.
    pub fn for_computer(comp: &str) -> Self {
        Self {
            device_type: "tx".to_string(),
            filter_c_description: comp.to_string(),
        }
    }
}

/// The three roster-service operations the relay depends on.
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Exchange credentials for a session token.
    async fn authenticate(&self, credentials: &Credentials) -> Result<String>;

    /// Fetch the full device roster.
    async fn list_devices(&self, token: &str) -> Result<Vec<Device>>;

    /// Look up the channel name matching a filter, if any.
    async fn list_channels(&self, filter: &ChannelFilter, token: &str) -> Result<Option<String>>;
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: Vec<Device>,
}

#[derive(Deserialize)]
struct ChannelName {
    #[serde(rename = "c_name")]
    name: String,
}

#[derive(Deserialize)]
struct ChannelsEnvelope {
    channel: ChannelName,
}

#[derive(Deserialize)]
struct ChannelsResponse {
    channels: Option<ChannelsEnvelope>,
}

/// HTTP implementation of [`RosterApi`] against an AIM-style REST endpoint.
pub struct AimClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AimClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RelayError::InvalidRosterUrl(format!("{path} against {}: {e}", self.base_url)))
    }
}

#[async_trait]
impl RosterApi for AimClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let url = self.endpoint("api/login")?;
        let response = self.http.post(url).json(credentials).send().await?;

        if !response.status().is_success() {
            return Err(RelayError::AuthFailed(format!(
                "login returned {}",
                response.status()
            )));
        }

        let login: LoginResponse = response.json().await?;
        Ok(login.token)
    }

    async fn list_devices(&self, token: &str) -> Result<Vec<Device>> {
        let url = self.endpoint("api/devices")?;
        let response = self
            .http
            .get(url)
            .query(&[("token", token)])
            .send()
            .await?
            .error_for_status()?;

        let devices: DevicesResponse = response.json().await?;
        Ok(devices.devices)
    }

    async fn list_channels(&self, filter: &ChannelFilter, token: &str) -> Result<Option<String>> {
        let url = self.endpoint("api/channels")?;
        let response = self
            .http
            .get(url)
            .query(&[
                ("device_type", filter.device_type.as_str()),
                ("filter_c_description", filter.filter_c_description.as_str()),
                ("token", token),
            ])
            .send()
            .await?
            .error_for_status()?;

        let channels: ChannelsResponse = response.json().await?;
        Ok(channels.channels.map(|c| c.channel.name))
    }
}
