// Shared components
pub mod config;
pub mod error;
pub mod metrics;
pub mod ratelimit;

// Domain layer
pub mod notification;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod shutdown;
pub mod tasks;
pub mod telemetry;
