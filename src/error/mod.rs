use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid payload (score/total required)";
pub const MISSING_CONFIGURATION_MESSAGE: &str = "Missing TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID";
pub const BACKEND_ERROR_MESSAGE: &str = "Telegram API error";
pub const ORIGIN_NOT_ALLOWED_MESSAGE: &str = "CORS: not allowed";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Caller data failed the required-field or type checks
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Server setup is incomplete; callers cannot fix this
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// The messaging backend answered with a non-success status
    #[error("Backend rejected message (status {status}): {details}")]
    Backend { status: u16, details: String },

    #[error("{0}")]
    Internal(String),

    #[error("Rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),
}

impl AppError {
    /// Short machine-readable label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config_error",
            AppError::InvalidPayload(_) => "invalid_payload",
            AppError::MissingConfiguration(_) => "missing_configuration",
            AppError::Backend { .. } => "backend_error",
            AppError::Internal(_) => "internal_error",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::OriginNotAllowed(_) => "origin_not_allowed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            AppError::Config(_) | AppError::MissingConfiguration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Failure body shared by every endpoint: `{ok:false, error, details?}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::Config(e) => ErrorResponse::new(e.to_string()),
            AppError::InvalidPayload(_) => ErrorResponse::new(INVALID_PAYLOAD_MESSAGE),
            AppError::MissingConfiguration(_) => ErrorResponse::new(MISSING_CONFIGURATION_MESSAGE),
            AppError::Backend { details, .. } => {
                ErrorResponse::new(BACKEND_ERROR_MESSAGE).with_details(details.clone())
            }
            AppError::Internal(msg) => ErrorResponse::new(msg.clone()),
            AppError::RateLimited { retry_after } => ErrorResponse::new(format!(
                "Too many requests, please retry after {} seconds",
                retry_after
            )),
            AppError::OriginNotAllowed(_) => ErrorResponse::new(ORIGIN_NOT_ALLOWED_MESSAGE),
        };

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(
                kind = %self.kind(),
                status = %status.as_u16(),
                message = %self,
                "Request failed"
            );
        } else {
            tracing::warn!(
                kind = %self.kind(),
                status = %status.as_u16(),
                message = %self,
                "Request rejected"
            );
        }

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
