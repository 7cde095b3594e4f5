mod app;
mod middleware;
mod state;

pub use app::{build_cors_layer, create_app};
pub use middleware::{client_key, origin_guard, rate_limit_middleware};
pub use state::AppState;
