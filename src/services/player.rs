//! External player launch
//!
//! The player receives the source URL itself; resolving it to individual
//! streams is left to the player.

use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

use crate::config::PlayerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::SourceUrl;
use crate::utils::UrlUtils;

#[derive(Debug, Clone)]
pub struct PlayerLauncher {
    command: String,
    args: Vec<String>,
}

impl PlayerLauncher {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
        }
    }

    /// Arguments the player is started with: configured args, then the URL
    pub fn arguments(&self, url: &SourceUrl) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(url.to_string());
        args
    }

    /// Spawn the player without waiting for it. Returns the child's pid when
    /// the platform reports one.
    pub fn launch(&self, url: &SourceUrl) -> AppResult<Option<u32>> {
        let child = Command::new(&self.command)
            .args(self.arguments(url))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AppError::Player {
                command: self.command.clone(),
                source,
            })?;

        let pid = child.id();
        info!(
            "Launched {} (pid {:?}) for {}",
            self.command,
            pid,
            UrlUtils::obfuscate_credentials(url.as_str())
        );
        Ok(pid)
    }
}
