// src/services/telegram.rs

//! Telegram notifier.
//!
//! Delivers watcher messages to the configured chat through the Bot API
//! `sendMessage` method. Every failure surfaces as a delivery error so the
//! poll loop can tell it apart from API-side failures.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::config::{Credentials, Settings};
use crate::error::{AppError, Result};
use crate::utils::http::create_client;

/// Destination for watcher notifications.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver a text message to the configured chat.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Telegram Bot API client for a single chat.
pub struct TelegramNotifier {
    client: Client,
    send_url: Url,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the configured bot and chat.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            send_url: send_message_url(&settings.telegram_api_base, &credentials.telegram_token)?,
            chat_id: credentials.chat_id.clone(),
        })
    }
}

#[async_trait]
impl MessageSink for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.send_url.clone())
            .json(&json!({"chat_id": self.chat_id, "text": text}))
            .send()
            .await
            .map_err(AppError::delivery)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::delivery(format!(
                "Telegram API answered with HTTP status {}",
                status.as_u16()
            )));
        }

        log::info!("delivered notification: {text}");
        Ok(())
    }
}

/// Build the `sendMessage` URL for a bot token.
fn send_message_url(api_base: &str, token: &str) -> Result<Url> {
    let base = api_base.trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/bot{token}/sendMessage"))?)
}
