// src/config.rs

//! Application configuration.
//!
//! Runtime settings are tunables with safe defaults, loadable from a TOML
//! file. Credentials come exclusively from the process environment and are
//! validated once at startup; a missing or empty credential is fatal.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable holding the review API token.
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat id.
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Runtime settings for the watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Homework status endpoint URL
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Base URL of the Telegram Bot API
    #[serde(default = "defaults::telegram_api_base")]
    pub telegram_api_base: String,

    /// Seconds to sleep between poll cycles
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Settings load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate settings values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(AppError::config("endpoint is empty"));
        }
        if self.telegram_api_base.trim().is_empty() {
            return Err(AppError::config("telegram_api_base is empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(AppError::config("poll_interval_secs must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("timeout_secs must be > 0"));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: defaults::endpoint(),
            telegram_api_base: defaults::telegram_api_base(),
            poll_interval_secs: defaults::poll_interval(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Credentials for the review API and the Telegram chat.
///
/// Opaque tokens; only emptiness is checked.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Review API token (sent as `Authorization: OAuth <token>`)
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Destination chat id
    pub chat_id: String,
}

impl Credentials {
    /// Build credentials, rejecting empty tokens.
    pub fn new(
        practicum_token: impl Into<String>,
        telegram_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            practicum_token: practicum_token.into(),
            telegram_token: telegram_token.into(),
            chat_id: chat_id.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::new(
            env::var(PRACTICUM_TOKEN_VAR).unwrap_or_default(),
            env::var(TELEGRAM_TOKEN_VAR).unwrap_or_default(),
            env::var(TELEGRAM_CHAT_ID_VAR).unwrap_or_default(),
        )
    }

    fn validate(&self) -> Result<()> {
        if self.practicum_token.trim().is_empty() {
            return Err(AppError::config(format!("{PRACTICUM_TOKEN_VAR} is not set")));
        }
        if self.telegram_token.trim().is_empty() {
            return Err(AppError::config(format!("{TELEGRAM_TOKEN_VAR} is not set")));
        }
        if self.chat_id.trim().is_empty() {
            return Err(AppError::config(format!("{TELEGRAM_CHAT_ID_VAR} is not set")));
        }
        Ok(())
    }
}

/// Default values for settings.
mod defaults {
    pub fn endpoint() -> String {
        "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
    }

    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".to_string()
    }

    pub fn poll_interval() -> u64 {
        600
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn user_agent() -> String {
        format!("hwwatch/{}", env!("CARGO_PKG_VERSION"))
    }
}
