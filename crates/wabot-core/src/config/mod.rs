mod channels;
mod defaults;
mod responder;

#[cfg(test)]
mod tests;

pub use channels::*;
pub use responder::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::BotError;
use defaults::*;

/// Top-level wabot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Version string shown by `!info`.
    #[serde(default = "default_version")]
    pub version: String,
    /// Hosting platform shown by `!info`.
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Server label used in the online notice sent to the admin.
    #[serde(default = "default_platform")]
    pub server_name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional log file. Empty = stdout only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            platform: default_platform(),
            server_name: default_platform(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_file: String::new(),
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

/// Apply environment overrides through `lookup` (normally `std::env::var`).
///
/// `PORT` sets the HTTP port, `ADMIN_NUMBER` the admin to notify, and
/// `SERVER_NAME` (or `HEROKU_APP_NAME`) the server label.
pub fn apply_env<F>(config: &mut Config, lookup: F) -> Result<(), BotError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.api.port = port
            .trim()
            .parse()
            .map_err(|e| BotError::Config(format!("invalid PORT '{port}': {e}")))?;
    }
    if let Some(admin) = lookup("ADMIN_NUMBER") {
        config.whatsapp.admin_number = admin.trim().to_string();
    }
    if let Some(server) = lookup("SERVER_NAME").or_else(|| lookup("HEROKU_APP_NAME")) {
        config.bot.server_name = server;
    }
    Ok(())
}

/// Reject configurations the responder cannot work with.
pub fn validate(config: &Config) -> Result<(), BotError> {
    let rate = config.responder.fallback_rate;
    if !(0.0..=1.0).contains(&rate) {
        return Err(BotError::Config(format!(
            "responder.fallback_rate must be within [0, 1], got {rate}"
        )));
    }

    for key in config.responder.commands.keys() {
        if key.trim().is_empty() {
            return Err(BotError::Config("responder.commands has an empty key".into()));
        }
    }

    for (i, rule) in config.responder.keywords.iter().enumerate() {
        if rule.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(BotError::Config(format!(
                "responder.keywords[{i}] has no non-empty keyword"
            )));
        }
    }

    Ok(())
}

/// Parse configuration from TOML text. No environment overrides.
pub fn parse(content: &str) -> Result<Config, BotError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| BotError::Config(format!("failed to parse config: {e}")))?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a TOML file and apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, BotError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}
