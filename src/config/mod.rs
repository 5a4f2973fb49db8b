use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// HTTP retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Total time allowed for one playlist request, body included
    #[serde(default = "default_fetch_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Upper bound on sources fetched at the same time
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
    /// Text stored in place of the group on a failed source's placeholder
    #[serde(default = "default_failure_label")]
    pub failure_label: String,
}

/// External player used by the `play` command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_command")]
    pub command: String,
    /// Extra arguments placed before the playlist URL
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_max_concurrent_fetches() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_failure_label() -> String {
    DEFAULT_FAILURE_LABEL.to_string()
}

fn default_player_command() -> String {
    DEFAULT_PLAYER_COMMAND.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            failure_label: default_failure_label(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: Vec::new(),
        }
    }
}

impl Config {
    /// Built-in defaults, overlaid by the TOML file (skipped when missing),
    /// overlaid by `IPTV_CATALOG_*` environment variables. Nested keys use a
    /// double underscore: `IPTV_CATALOG_FETCH__TIMEOUT=10s`.
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let config_file = config_file.as_ref();
        if !config_file.exists() {
            debug!("Config file {} not found, using defaults", config_file.display());
        }

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.ingestion.max_concurrent_fetches == 0 {
            return Err(AppError::configuration(
                "ingestion.max_concurrent_fetches must be at least 1",
            ));
        }
        if self.player.command.trim().is_empty() {
            return Err(AppError::configuration("player.command must not be empty"));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::configuration(e.to_string()))
    }
}
