//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{BACKEND_LATENCY, NOTIFICATIONS_TOTAL, RATELIMIT_DECISIONS_TOTAL};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording notification metrics
pub struct NotifyMetrics;

impl NotifyMetrics {
    /// Record a message the backend accepted
    pub fn record_sent() {
        NOTIFICATIONS_TOTAL.with_label_values(&["sent"]).inc();
    }

    /// Record a failed request, labelled by error kind
    pub fn record_failure(kind: &str) {
        NOTIFICATIONS_TOTAL.with_label_values(&[kind]).inc();
    }

    /// Record how long one backend call took
    pub fn observe_backend_latency(seconds: f64) {
        BACKEND_LATENCY.observe(seconds);
    }
}

/// Helper struct for recording rate limit metrics
pub struct RateLimitMetrics;

impl RateLimitMetrics {
    pub fn record_allowed() {
        RATELIMIT_DECISIONS_TOTAL.with_label_values(&["allowed"]).inc();
    }

    pub fn record_denied() {
        RATELIMIT_DECISIONS_TOTAL.with_label_values(&["denied"]).inc();
    }
}
