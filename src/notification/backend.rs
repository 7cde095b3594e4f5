//! Messaging backend abstraction.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Markup dialect understood by the backend's renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

/// The `sendMessage` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
}

impl OutboundMessage {
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: ParseMode::Html,
            disable_web_page_preview: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Backend answered with a non-2xx status; `details` is its raw body
    #[error("backend rejected message with status {status}: {details}")]
    Rejected { status: u16, details: String },

    /// The request never produced a usable response
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// A service that can deliver a rendered message to a chat.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    /// Deliver one message. Exactly one attempt is made.
    async fn send_message(
        &self,
        bot_token: &str,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError>;

    /// Human-readable backend name for logs
    fn name(&self) -> &str;
}
