mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::RemindError;
use defaults::*;

/// Environment variable consulted when `bot_token` is left empty.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level remindbot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Task store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Scheduler configuration -- reminder delivery cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Parse configuration from TOML text.
pub fn from_toml(content: &str) -> Result<Config, RemindError> {
    toml::from_str(content)
        .map_err(|e| RemindError::Config(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. An empty Telegram
/// token is filled from `TELEGRAM_BOT_TOKEN`.
pub fn load(path: &str) -> Result<Config, RemindError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RemindError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        from_toml(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_token_env(&mut config, std::env::var(TELEGRAM_TOKEN_ENV).ok());
    Ok(config)
}

/// Fill an empty Telegram token from the environment, enabling the channel
/// when it was not configured at all.
fn apply_token_env(config: &mut Config, env_token: Option<String>) {
    let token = match env_token {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => return,
    };
    match config.channel.telegram {
        Some(ref mut tg) if tg.bot_token.is_empty() => tg.bot_token = token,
        Some(_) => {}
        None => {
            config.channel.telegram = Some(TelegramConfig {
                enabled: true,
                bot_token: token,
            });
        }
    }
}
