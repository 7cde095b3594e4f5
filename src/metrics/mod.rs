//! Prometheus metrics for the relay.
//!
//! - Notification outcomes (sent, rejected, failed, by error kind)
//! - Backend call latency
//! - Rate limiting decisions

mod helpers;

pub use helpers::{encode_metrics, NotifyMetrics, RateLimitMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Histogram, IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "quiz_relay";

lazy_static! {
    /// Notification requests by final outcome
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_total", METRIC_PREFIX),
        "Notification requests by outcome",
        &["outcome"]
    ).unwrap();

    /// Time spent waiting on the messaging backend
    pub static ref BACKEND_LATENCY: Histogram = register_histogram!(
        format!("{}_backend_latency_seconds", METRIC_PREFIX),
        "Messaging backend call latency in seconds",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Rate limit decisions on the public API
    pub static ref RATELIMIT_DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_ratelimit_decisions_total", METRIC_PREFIX),
        "Rate limit decisions",
        &["decision"]
    ).unwrap();
}
