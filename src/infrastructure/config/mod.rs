//! Configuration management
//!
//! Defaults, then an optional YAML file, then environment variables, then
//! the `--token` flag.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::services::PollSettings;
use crate::infrastructure::adapters::telegram::API_BASE;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub polling: PollingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Chat that receives a notice when polling starts
    pub log_chat_id: Option<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct PollingConfig {
    pub timeout_sec: u64,
    pub sleep_sec: f64,
    pub retry_sec: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "dice-bot".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            log_chat_id: None,
            api_base: API_BASE.to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_sec: 50,
            sleep_sec: 0.5,
            retry_sec: 2.0,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Full startup resolution: the file at `path` if it exists (a file that
    /// fails to parse is an error, not a fallback), the environment, then
    /// `token_override`. The result is validated.
    pub fn resolve(path: impl AsRef<Path>, token_override: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve_with_vars(path, token_override, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_vars<F>(
        path: impl AsRef<Path>,
        token_override: Option<String>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let config = if path.exists() {
            Config::load(path)?.with_vars(lookup)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Config::default().with_vars(lookup)?
        };

        let config = config.with_token(token_override);
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values count as unset.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = var("BOT_TOKEN") {
            self.telegram.token = Some(token);
        }
        if let Some(chat_id) = var("LOG_CHAT_ID") {
            self.telegram.log_chat_id = Some(chat_id);
        }
        if let Some(api_base) = var("TELEGRAM_API_BASE") {
            self.telegram.api_base = api_base;
        }
        if let Some(timeout) = var("POLL_TIMEOUT_SEC") {
            self.polling.timeout_sec = parse_var("POLL_TIMEOUT_SEC", &timeout)?;
        }
        if let Some(sleep) = var("POLL_SLEEP_SEC") {
            self.polling.sleep_sec = parse_var("POLL_SLEEP_SEC", &sleep)?;
        }
        if let Some(retry) = var("POLL_RETRY_SEC") {
            self.polling.retry_sec = parse_var("POLL_RETRY_SEC", &retry)?;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }

        Ok(self)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token {
            self.telegram.token = Some(token);
        }
        self
    }

    /// Everything needed to start polling is present and sane
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token().is_none() {
            return Err(ConfigError::MissingField("BOT_TOKEN".to_string()));
        }
        seconds("polling.sleep-sec", self.polling.sleep_sec)?;
        seconds("polling.retry-sec", self.polling.retry_sec)?;
        self.socket_addr()?;
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.telegram.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| ConfigError::InvalidValue(format!("server address {}: {}", addr, e)))
    }

    pub fn poll_settings(&self) -> Result<PollSettings, ConfigError> {
        Ok(PollSettings {
            timeout_secs: self.polling.timeout_sec,
            idle_delay: seconds("polling.sleep-sec", self.polling.sleep_sec)?,
            retry_delay: seconds("polling.retry-sec", self.polling.retry_sec)?,
            log_chat_id: self.telegram.log_chat_id.clone(),
        })
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidValue(format!("{}={:?}: {}", key, value, e)))
}

fn seconds(field: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| ConfigError::InvalidValue(format!("{} = {}: {}", field, value, e)))
}
