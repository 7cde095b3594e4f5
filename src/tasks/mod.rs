mod cleanup;

pub use cleanup::RateLimitCleanupTask;
