//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod notify;
mod routes;

pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use notify::{telegram_notify, OkResponse};
pub use routes::api_routes;
