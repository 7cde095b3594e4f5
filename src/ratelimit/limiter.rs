//! Local rate limiter implementation

use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::config::RateLimitConfig;
use super::token_bucket::TokenBucket;

/// Result of a rate limit check
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        remaining: u32,
        limit: u32,
        /// Seconds until the client's quota is full again
        reset_after: u64,
    },
    /// Request is denied due to rate limiting
    Denied {
        retry_after: u64,
        limit: u32,
        reset_after: u64,
    },
}

impl RateLimitResult {
    #[cfg(test)]
    pub(crate) fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Keeps one token bucket per client key (usually the caller's IP).
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.window_seconds)
    }

    /// Check and consume one request for `key`.
    pub fn check(&self, key: &str) -> RateLimitResult {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitResult {
        let limit = self.config.max_requests;

        if !self.config.enabled {
            return RateLimitResult::Allowed {
                remaining: u32::MAX,
                limit: 0,
                reset_after: 0,
            };
        }

        let window = self.window();
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new_at(limit, window, now));

        if bucket.try_consume_at(now) {
            RateLimitResult::Allowed {
                remaining: bucket.remaining(),
                limit,
                reset_after: bucket.reset_after(),
            }
        } else {
            RateLimitResult::Denied {
                retry_after: bucket.retry_after(),
                limit,
                reset_after: bucket.reset_after(),
            }
        }
    }

    /// Clean up stale buckets that haven't been used recently
    pub fn cleanup_stale(&self) -> usize {
        self.cleanup_stale_at(Instant::now())
    }

    pub fn cleanup_stale_at(&self, now: Instant) -> usize {
        let ttl = Duration::from_secs(self.config.bucket_ttl_seconds);
        let before = self.buckets.len();

        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_activity()) < ttl);

        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            tracing::debug!(
                removed = removed,
                buckets = self.buckets.len(),
                "Cleaned up stale rate limit buckets"
            );
        }

        removed
    }

    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_disabled() {
        let config = RateLimitConfig {
            enabled: false,
            ..Default::default()
        };
        let limiter = RateLimiter::new(config);

        // Should always be allowed when disabled
        for _ in 0..100 {
            assert!(limiter.check("127.0.0.1").is_allowed());
        }
        assert_eq!(limiter.bucket_count(), 0);
    }

    #[test]
    fn test_rate_limiter_key_limit() {
        let config = RateLimitConfig {
            max_requests: 5,
            ..Default::default()
        };
        let limiter = RateLimiter::new(config);
        let now = Instant::now();

        // First 5 should be allowed
        for _ in 0..5 {
            assert!(limiter.check_at("192.168.1.1", now).is_allowed());
        }

        // 6th should be denied
        match limiter.check_at("192.168.1.1", now) {
            RateLimitResult::Denied {
                retry_after, limit, ..
            } => {
                assert_eq!(limit, 5);
                assert_eq!(retry_after, 12); // one token per 12s at 5/min
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_rate_limiter_different_keys() {
        let config = RateLimitConfig {
            max_requests: 3,
            ..Default::default()
        };
        let limiter = RateLimiter::new(config);
        let now = Instant::now();

        // Each key has its own bucket
        for _ in 0..3 {
            assert!(limiter.check_at("key-1", now).is_allowed());
        }
        assert!(!limiter.check_at("key-1", now).is_allowed());

        // key-2 should still have its full quota
        for _ in 0..3 {
            assert!(limiter.check_at("key-2", now).is_allowed());
        }
        assert!(!limiter.check_at("key-2", now).is_allowed());
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = RateLimiter::new(RateLimitConfig::default());
        let now = Instant::now();

        match limiter.check_at("10.0.0.1", now) {
            RateLimitResult::Allowed {
                remaining, limit, ..
            } => {
                assert_eq!(limit, 30);
                assert_eq!(remaining, 29);
            }
            other => panic!("expected allowed, got {:?}", other),
        }
    }

    #[test]
    fn test_cleanup_stale_buckets() {
        let config = RateLimitConfig {
            bucket_ttl_seconds: 300,
            ..Default::default()
        };
        let limiter = RateLimiter::new(config);
        let start = Instant::now();

        limiter.check_at("10.0.0.1", start);
        limiter.check_at("10.0.0.2", start + Duration::from_secs(200));
        assert_eq!(limiter.bucket_count(), 2);

        // Only the first bucket has been idle past the TTL
        let removed = limiter.cleanup_stale_at(start + Duration::from_secs(301));
        assert_eq!(removed, 1);
        assert_eq!(limiter.bucket_count(), 1);
    }
}
