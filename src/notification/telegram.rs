//! Telegram Bot API client.
//!
//! Delivers messages through the `sendMessage` endpoint. Every call is
//! bounded by the configured request timeout.

use std::time::Duration;

use async_trait::async_trait;

use super::backend::{DeliveryError, MessageBackend, OutboundMessage};
use crate::config::TelegramConfig;

/// Sends messages via the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn send_message_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, bot_token)
    }
}

#[async_trait]
impl MessageBackend for TelegramClient {
    async fn send_message(
        &self,
        bot_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError> {
        tracing::debug!(chat_id = %message.chat_id, "Sending Telegram message");

        // reqwest errors carry the URL, which contains the token
        let response = self
            .client
            .post(self.send_message_url(bot_token))
            .json(message)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(chat_id = %message.chat_id, "Telegram message sent");
            return Ok(());
        }

        let details = response
            .text()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        tracing::warn!(
            chat_id = %message.chat_id,
            status = status.as_u16(),
            details = %details,
            "Telegram API rejected message"
        );

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            details,
        })
    }

    fn name(&self) -> &str {
        "telegram"
    }
}
