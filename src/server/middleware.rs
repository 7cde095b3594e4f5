use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::error::AppError;
use crate::metrics::RateLimitMetrics;
use crate::ratelimit::RateLimitResult;

/// Rejects browser requests from origins outside the configured allow-list.
///
/// Requests without an `Origin` header (curl, server-to-server) pass, as do
/// all requests when the allow-list is empty.
pub async fn origin_guard(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let allowed = &state.settings.server.cors_origins;
    if allowed.is_empty() || allowed.iter().any(|o| o == "*") {
        return next.run(req).await;
    }

    let Some(origin) = req.headers().get(header::ORIGIN) else {
        return next.run(req).await;
    };

    let origin = origin.to_str().unwrap_or_default();
    if allowed.iter().any(|o| o == origin) {
        next.run(req).await
    } else {
        AppError::OriginNotAllowed(origin.to_string()).into_response()
    }
}

/// Rate limit key for a request: peer IP, or the last forwarded hop when
/// running behind one trusted proxy.
pub fn client_key(req: &Request<Body>, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit(',').map(str::trim).find(|s| !s.is_empty()));
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware for the public API.
///
/// Returns 429 Too Many Requests with Retry-After header when rate limited.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    // Skip if rate limiting is disabled
    if !state.rate_limiter.is_enabled() {
        return next.run(req).await;
    }

    let key = client_key(&req, state.rate_limiter.config().trust_proxy);

    match state.rate_limiter.check(&key) {
        RateLimitResult::Allowed {
            remaining,
            limit,
            reset_after,
        } => {
            RateLimitMetrics::record_allowed();
            let mut response = next.run(req).await;
            insert_rate_limit_headers(response.headers_mut(), limit, remaining, reset_after);
            response
        }
        RateLimitResult::Denied {
            retry_after,
            limit,
            reset_after,
        } => {
            RateLimitMetrics::record_denied();
            tracing::warn!(
                client = %key,
                retry_after = retry_after,
                "Rate limit exceeded"
            );

            let mut response = AppError::RateLimited { retry_after }.into_response();
            let headers = response.headers_mut();
            insert_rate_limit_headers(headers, limit, 0, reset_after);
            if let Ok(v) = HeaderValue::from_str(&retry_after.to_string()) {
                headers.insert(header::RETRY_AFTER, v);
            }
            response
        }
    }
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset: u64) {
    if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert("ratelimit-limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("ratelimit-remaining", v);
    }
    if let Ok(v) = HeaderValue::from_str(&reset.to_string()) {
        headers.insert("ratelimit-reset", v);
    }
}
