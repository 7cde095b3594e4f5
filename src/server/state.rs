use std::sync::Arc;

use crate::config::Settings;
use crate::notification::{MessageBackend, QuizNotifier, TelegramClient};
use crate::ratelimit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub notifier: Arc<QuizNotifier>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Build state that talks to the real Telegram API.
    pub fn new(settings: Settings) -> Result<Self, reqwest::Error> {
        let backend = Arc::new(TelegramClient::new(&settings.telegram)?);
        Ok(Self::with_backend(settings, backend))
    }

    /// Build state around any messaging backend.
    pub fn with_backend(settings: Settings, backend: Arc<dyn MessageBackend>) -> Self {
        let notifier = Arc::new(QuizNotifier::new(settings.telegram.clone(), backend));
        let rate_limiter = Arc::new(RateLimiter::new(settings.ratelimit.clone()));

        Self {
            settings: Arc::new(settings),
            notifier,
            rate_limiter,
        }
    }
}
