//! Token Bucket algorithm implementation

use std::time::{Duration, Instant};

/// Token Bucket for rate limiting.
///
/// Tokens refill continuously at `capacity / window` and never exceed the
/// capacity. Callers get exclusive access through the limiter's map entry,
/// so the bucket itself needs no synchronization.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    /// Current number of tokens, fractional between refills
    tokens: f64,
    /// Maximum bucket capacity
    capacity: f64,
    /// Milliseconds needed to refill an empty bucket
    window_ms: f64,
    /// Time the token count was last brought up to date
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket holding `capacity` tokens, refilled over `window`.
    pub fn new_at(capacity: u32, window: Duration, now: Instant) -> Self {
        let window_ms = window.as_millis().max(1) as f64;
        Self {
            tokens: capacity as f64,
            capacity: capacity as f64,
            window_ms,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed_ms = now.saturating_duration_since(self.last_refill).as_secs_f64() * 1000.0;
        if elapsed_ms > 0.0 {
            let added = elapsed_ms * self.capacity / self.window_ms;
            self.tokens = (self.tokens + added).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Try to consume one token from the bucket.
    /// Returns true if a token was available, false otherwise.
    pub fn try_consume_at(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Whole tokens currently available
    pub fn remaining(&self) -> u32 {
        self.tokens.floor().max(0.0) as u32
    }

    /// Seconds until at least one token is available (0 if one is now)
    pub fn retry_after(&self) -> u64 {
        if self.tokens >= 1.0 {
            return 0;
        }
        self.secs_until(1.0)
    }

    /// Seconds until the bucket is full again
    pub fn reset_after(&self) -> u64 {
        self.secs_until(self.capacity)
    }

    fn secs_until(&self, level: f64) -> u64 {
        let missing = (level - self.tokens).max(0.0);
        if missing == 0.0 {
            return 0;
        }
        if self.capacity <= 0.0 {
            return u64::MAX;
        }
        let missing_ms = missing * self.window_ms / self.capacity;
        (missing_ms / 1000.0).ceil().max(1.0) as u64
    }

    /// Get the last activity time
    pub fn last_activity(&self) -> Instant {
        self.last_refill
    }
}
