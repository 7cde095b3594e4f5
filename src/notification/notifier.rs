//! The quiz result notification pipeline.

use std::sync::Arc;
use std::time::Instant;

use super::backend::{DeliveryError, MessageBackend, OutboundMessage};
use super::format::render_message;
use super::payload::QuizResult;
use crate::config::TelegramConfig;
use crate::error::{AppError, Result};
use crate::metrics::NotifyMetrics;

/// Validates a quiz result, renders it and hands it to the backend.
///
/// Credentials come from the injected [`TelegramConfig`]; they are checked
/// per request so a misconfigured process still starts and reports the
/// problem to callers.
pub struct QuizNotifier {
    config: TelegramConfig,
    backend: Arc<dyn MessageBackend>,
}

/// Resolved delivery credentials
struct Destination<'a> {
    bot_token: &'a str,
    chat_id: &'a str,
}

impl QuizNotifier {
    pub fn new(config: TelegramConfig, backend: Arc<dyn MessageBackend>) -> Self {
        Self { config, backend }
    }

    /// Whether both credentials are present
    pub fn is_configured(&self) -> bool {
        self.destination().is_ok()
    }

    /// Run the pipeline on a raw request body.
    pub async fn handle(&self, body: &[u8]) -> Result<()> {
        let outcome = self.run(body).await;
        match &outcome {
            Ok(()) => NotifyMetrics::record_sent(),
            Err(e) => NotifyMetrics::record_failure(e.kind()),
        }
        outcome
    }

    async fn run(&self, body: &[u8]) -> Result<()> {
        let result = QuizResult::from_body(body)?;
        let destination = self.destination()?;

        if result.total == 0.0 && result.percent.is_none() {
            tracing::warn!(score = result.score, "Quiz total is zero, percent is undefined");
        }

        let message = OutboundMessage::html(destination.chat_id, render_message(&result));
        self.deliver(destination.bot_token, &message).await
    }

    fn destination(&self) -> Result<Destination<'_>> {
        let bot_token = non_empty(self.config.bot_token.as_deref());
        let chat_id = non_empty(self.config.chat_id.as_deref());

        match (bot_token, chat_id) {
            (Some(bot_token), Some(chat_id)) => Ok(Destination { bot_token, chat_id }),
            (bot_token, chat_id) => Err(AppError::MissingConfiguration(format!(
                "bot token set: {}, chat id set: {}",
                bot_token.is_some(),
                chat_id.is_some()
            ))),
        }
    }

    async fn deliver(&self, bot_token: &str, message: &OutboundMessage) -> Result<()> {
        let started = Instant::now();
        let sent = self.backend.send_message(bot_token, message).await;
        NotifyMetrics::observe_backend_latency(started.elapsed().as_secs_f64());

        sent.map_err(|e| match e {
            DeliveryError::Rejected { status, details } => AppError::Backend { status, details },
            DeliveryError::Transport(source) => {
                tracing::error!(
                    backend = %self.backend.name(),
                    error = %source,
                    "Backend call failed"
                );
                AppError::Internal(format!("{:#}", anyhow::Error::from(source)))
            }
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::notification::format::{STATUS_PASSED, STATUS_RETRY};

    /// Records every message; answers with a fixed rejection when set.
    #[derive(Default)]
    struct RecordingBackend {
        sent: Mutex<Vec<(String, OutboundMessage)>>,
        reject_with: Option<(u16, String)>,
    }

    impl RecordingBackend {
        fn rejecting(status: u16, details: &str) -> Self {
            Self {
                reject_with: Some((status, details.to_string())),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, OutboundMessage)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageBackend for RecordingBackend {
        async fn send_message(
            &self,
            bot_token: &str,
            message: &OutboundMessage,
        ) -> std::result::Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((bot_token.to_string(), message.clone()));
            match &self.reject_with {
                Some((status, details)) => Err(DeliveryError::Rejected {
                    status: *status,
                    details: details.clone(),
                }),
                None => Ok(()),
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn configured() -> TelegramConfig {
        TelegramConfig {
            bot_token: Some("123:ABC".to_string()),
            chat_id: Some("-100500".to_string()),
            ..Default::default()
        }
    }

    fn build_notifier(config: TelegramConfig, backend: Arc<RecordingBackend>) -> QuizNotifier {
        QuizNotifier::new(config, backend)
    }

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_payload_makes_no_call() {
        let backend = Arc::new(RecordingBackend::default());
        let notifier = build_notifier(configured(), backend.clone());

        for payload in [
            json!({}),
            json!({"score": 5}),
            json!({"total": 5}),
            json!({"score": "5", "total": 5}),
            json!({"score": 5, "total": null}),
        ] {
            let result = notifier.handle(&body(payload)).await;
            assert!(matches!(result, Err(AppError::InvalidPayload(_))));
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validation_precedes_configuration_check() {
        let backend = Arc::new(RecordingBackend::default());
        let notifier = build_notifier(TelegramConfig::default(), backend.clone());

        let result = notifier.handle(b"{}").await;
        assert!(matches!(result, Err(AppError::InvalidPayload(_))));
    }

    #[tokio::test]
    async fn test_missing_configuration_makes_no_call() {
        let backend = Arc::new(RecordingBackend::default());
        let payload = body(json!({"score": 1, "total": 2}));

        for config in [
            TelegramConfig::default(),
            TelegramConfig {
                bot_token: Some("123:ABC".to_string()),
                ..Default::default()
            },
            TelegramConfig {
                chat_id: Some("-100".to_string()),
                ..Default::default()
            },
            TelegramConfig {
                bot_token: Some(String::new()),
                chat_id: Some("-100".to_string()),
                ..Default::default()
            },
        ] {
            let notifier = build_notifier(config, backend.clone());
            assert!(!notifier.is_configured());
            let result = notifier.handle(&payload).await;
            assert!(matches!(result, Err(AppError::MissingConfiguration(_))));
        }
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_delivery() {
        let backend = Arc::new(RecordingBackend::default());
        let notifier = build_notifier(configured(), backend.clone());

        notifier
            .handle(&body(json!({
                "name": "<b>X</b>",
                "phone": "+100",
                "score": 5,
                "total": 5,
                "passed": true
            })))
            .await
            .unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        let (token, message) = &calls[0];
        assert_eq!(token, "123:ABC");
        assert_eq!(message.chat_id, "-100500");
        assert!(message.disable_web_page_preview);
        assert!(message.text.contains("&lt;b&gt;X&lt;/b&gt;"));
        assert!(!message.text.contains("<b>X</b>"));
        assert!(message.text.contains("+100"));
        assert!(message.text.contains("5/5 (100%)"));
        assert!(message.text.contains(STATUS_PASSED));
    }

    #[tokio::test]
    async fn test_computed_percent_and_retry_status() {
        let backend = Arc::new(RecordingBackend::default());
        let notifier = build_notifier(configured(), backend.clone());

        notifier
            .handle(&body(json!({"score": 8, "total": 10})))
            .await
            .unwrap();

        let (_, message) = &backend.calls()[0];
        assert!(message.text.contains("8/10 (80%)"));
        assert!(message.text.contains(STATUS_RETRY));
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_details() {
        let backend = Arc::new(RecordingBackend::rejecting(400, "rejected"));
        let notifier = build_notifier(configured(), backend.clone());

        let result = notifier
            .handle(&body(json!({"score": 1, "total": 1})))
            .await;

        match result {
            Err(AppError::Backend { status, details }) => {
                assert_eq!(status, 400);
                assert_eq!(details, "rejected");
            }
            other => panic!("expected backend error, got {:?}", other),
        }
        // exactly one attempt, no retry
        assert_eq!(backend.calls().len(), 1);
    }
}
