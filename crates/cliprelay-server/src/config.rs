//! Server configuration.

use anyhow::Result;
use cliprelay_core::{Credentials, ResolutionStrategy};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

/// Where the device-management service lives and how to log in to it.
/// Credentials left out of the config file fall back to the
/// `AIM_USERNAME` / `AIM_PASSWORD` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterConfig {
    #[serde(default = "default_roster_url")]
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Roster freshness policy for channel resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionConfig {
    #[serde(default = "default_resolution_mode")]
    pub mode: ResolutionMode,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    AlwaysFresh,
    Cache,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./build")
}

fn default_roster_url() -> String {
    "http://localhost:8081/".to_string()
}

fn default_resolution_mode() -> ResolutionMode {
    ResolutionMode::AlwaysFresh
}

fn default_cache_ttl_secs() -> u64 {
    5
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            base_url: default_roster_url(),
            username: None,
            password: None,
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            mode: default_resolution_mode(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            roster: RosterConfig::default(),
            resolution: ResolutionConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default location (config/default.toml) or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        Ok(Config::default())
    }

    /// Roster credentials, from the config file or the environment.
    pub fn credentials(&self) -> Option<Credentials> {
        let username = self
            .roster
            .username
            .clone()
            .or_else(|| std::env::var("AIM_USERNAME").ok())?;
        let password = self
            .roster
            .password
            .clone()
            .or_else(|| std::env::var("AIM_PASSWORD").ok())?;
        Some(Credentials { username, password })
    }

    pub fn resolution_strategy(&self) -> ResolutionStrategy {
        match self.resolution.mode {
            ResolutionMode::AlwaysFresh => ResolutionStrategy::AlwaysFresh,
            ResolutionMode::Cache => {
                ResolutionStrategy::CacheWithTtl(Duration::from_secs(self.resolution.cache_ttl_secs))
            }
        }
    }
}
