//! Rate limiting for the public API using a token bucket per client.
//!
//! Buckets live in memory only; each process limits independently.

mod config;
mod limiter;
mod token_bucket;

pub use config::RateLimitConfig;
pub use limiter::{RateLimitResult, RateLimiter};
pub use token_bucket::TokenBucket;
