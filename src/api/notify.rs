//! Quiz result notification endpoint.

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// POST /api/telegram-notify
///
/// The body is read raw so that a missing or malformed JSON body is
/// reported as an invalid payload rather than an extractor rejection.
#[tracing::instrument(
    name = "http.telegram_notify",
    skip(state, body),
    fields(body_len = body.len())
)]
pub async fn telegram_notify(State(state): State<AppState>, body: Bytes) -> Result<Json<OkResponse>> {
    state.notifier.handle(&body).await?;
    Ok(Json(OkResponse { ok: true }))
}
