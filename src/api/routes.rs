use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::server::{rate_limit_middleware, AppState};

use super::health::health;
use super::metrics::prometheus_metrics;
use super::notify::telegram_notify;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/healthz", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Notification endpoints, rate limited per client
        .nest(
            "/api",
            Router::new()
                .route("/telegram-notify", post(telegram_notify))
                .route_layer(from_fn_with_state(state, rate_limit_middleware)),
        )
}
