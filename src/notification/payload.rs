//! Inbound quiz result payload and its validation.

use serde_json::{Map, Value};

use super::format::format_number;
use crate::error::{AppError, Result};

/// A validated quiz result, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    pub name: String,
    pub phone: String,
    pub score: f64,
    pub total: f64,
    /// Caller-supplied percent; derived from score/total when absent
    pub percent: Option<f64>,
    pub passed: bool,
}

impl QuizResult {
    /// Parse a raw request body.
    ///
    /// Empty or malformed bodies are treated as an empty object and so fail
    /// the `score`/`total` check like any other incomplete payload.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Request body is not valid JSON");
                Value::Null
            })
        };
        Self::from_json(&value)
    }

    /// Validate a decoded JSON value. Non-object values count as `{}`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        let score = required_number(fields, "score")?;
        let total = required_number(fields, "total")?;

        Ok(Self {
            name: optional_text(fields, "name")?,
            phone: optional_text(fields, "phone")?,
            score,
            total,
            percent: fields.get("percent").and_then(Value::as_f64),
            passed: fields.get("passed").map(is_truthy).unwrap_or(false),
        })
    }
}

fn required_number(fields: &Map<String, Value>, key: &str) -> Result<f64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| AppError::InvalidPayload(format!("`{}` must be a number", key)))
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<String> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string())),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(AppError::InvalidPayload(format!(
            "`{}` must be text",
            key
        ))),
    }
}

/// Loose truthiness: false, 0, "", and null are false; anything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
