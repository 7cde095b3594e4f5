use config::{Config, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::env;

use crate::ratelimit::RateLimitConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub ratelimit: RateLimitConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed caller origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

/// Telegram Bot API credentials and client settings.
///
/// Both credentials are optional at load time; the notifier reports a
/// missing one per request instead of refusing to start.
#[derive(Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Upper bound for one sendMessage call, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

// Hand-written so the bot token never ends up in logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// OpenTelemetry exporter settings
#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_otel_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_body_limit() -> usize {
    64 * 1024 // 64 KiB
}

fn default_service_name() -> String {
    "quiz-telegram".to_string()
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000 // 10 seconds
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_service_name() -> String {
    "quiz-notify-relay".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

/// Split a comma separated origin list, dropping blanks.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let vars = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        Self::from_vars(vars)
    }

    /// Load settings from an explicit set of environment variables.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        let run_mode = vars
            .get("RUN_MODE")
            .cloned()
            .unwrap_or_else(|| "development".into());

        let origins = vars.get("FRONTEND_ORIGIN").map(|raw| parse_origin_list(raw));

        let port = match vars.get("PORT") {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::Message(format!("PORT must be a valid port number: {}", e))
            })?),
            None => None,
        };

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("server.body_limit_bytes", default_body_limit() as u64)?
            .set_default("telegram.api_base", default_api_base())?
            .set_default("telegram.request_timeout_ms", default_request_timeout_ms())?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // QUIZ__SERVER__PORT, QUIZ__TELEGRAM__API_BASE, QUIZ__RATELIMIT__ENABLED, ...
            .add_source(
                Environment::with_prefix("QUIZ")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .source(Some(vars.clone())),
            )
            // Flat variables used by existing deployments win over everything
            .set_override_option("telegram.bot_token", vars.get("TELEGRAM_BOT_TOKEN").cloned())?
            .set_override_option("telegram.chat_id", vars.get("TELEGRAM_CHAT_ID").cloned())?
            .set_override_option("server.cors_origins", origins)?
            .set_override_option("server.port", port)?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            body_limit_bytes: default_body_limit(),
            service_name: default_service_name(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: default_api_base(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_otel_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            telegram: TelegramConfig::default(),
            ratelimit: RateLimitConfig::default(),
            otel: OtelConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3001);
        assert_eq!(server.body_limit_bytes, 65536);
        assert_eq!(server.service_name, "quiz-telegram");
        assert!(server.cors_origins.is_empty());

        let telegram = TelegramConfig::default();
        assert!(telegram.bot_token.is_none());
        assert!(telegram.chat_id.is_none());
        assert_eq!(telegram.api_base, "https://api.telegram.org");
        assert_eq!(telegram.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_parse_origin_list() {
        let origins = parse_origin_list(" https://a.example , ,https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
        assert!(parse_origin_list("").is_empty());
    }

    fn vars(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_defaults() {
        let settings = Settings::from_vars(Map::new()).unwrap();
        assert_eq!(settings.server.port, 3001);
        assert!(settings.server.cors_origins.is_empty());
        assert!(settings.telegram.bot_token.is_none());
        assert!(settings.telegram.chat_id.is_none());
        assert_eq!(settings.ratelimit.max_requests, 30);
        assert_eq!(settings.server_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_from_vars_flat_variables() {
        let settings = Settings::from_vars(vars(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("TELEGRAM_CHAT_ID", "-100200"),
            ("FRONTEND_ORIGIN", " https://a.x , https://b.x "),
            ("PORT", "4000"),
        ]))
        .unwrap();

        assert_eq!(settings.telegram.bot_token.as_deref(), Some("123:ABC"));
        assert_eq!(settings.telegram.chat_id.as_deref(), Some("-100200"));
        assert_eq!(settings.server.cors_origins, vec!["https://a.x", "https://b.x"]);
        assert_eq!(settings.server.port, 4000);
    }

    #[test]
    fn test_from_vars_prefixed_sections() {
        let settings = Settings::from_vars(vars(&[
            ("QUIZ__RATELIMIT__MAX_REQUESTS", "7"),
            ("QUIZ__TELEGRAM__REQUEST_TIMEOUT_MS", "2500"),
            ("QUIZ__SERVER__HOST", "127.0.0.1"),
        ]))
        .unwrap();

        assert_eq!(settings.ratelimit.max_requests, 7);
        assert_eq!(settings.telegram.request_timeout_ms, 2500);
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_flat_port_wins_over_prefixed() {
        let settings = Settings::from_vars(vars(&[
            ("QUIZ__SERVER__PORT", "5000"),
            ("PORT", "6000"),
        ]))
        .unwrap();
        assert_eq!(settings.server.port, 6000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Settings::from_vars(vars(&[("PORT", "abc")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let telegram = TelegramConfig {
            bot_token: Some("123:SECRET".to_string()),
            chat_id: Some("-100".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", telegram);
        assert!(!printed.contains("SECRET"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("-100"));
    }
}
