use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use quiz_notify_relay::config::Settings;
use quiz_notify_relay::server::{create_app, AppState};
use quiz_notify_relay::shutdown::shutdown_signal;
use quiz_notify_relay::tasks::RateLimitCleanupTask;
use quiz_notify_relay::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    // Create application state
    let state = AppState::new(settings.clone()).context("failed to build Telegram client")?;
    if !state.notifier.is_configured() {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID is not set; notifications will fail until configured"
        );
    }
    tracing::info!(
        allowed_origins = ?settings.server.cors_origins,
        rate_limit_enabled = settings.ratelimit.enabled,
        "Application state initialized"
    );

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Start rate limit cleanup in background
    let cleanup_task = RateLimitCleanupTask::new(state.rate_limiter.clone(), shutdown_tx.subscribe());
    let cleanup_handle = tokio::spawn(cleanup_task.run());

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Telegram notify server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_tx))
    .await?;

    // Wait for background tasks to finish
    let _ = cleanup_handle.await;

    tracing::info!("Server shutdown complete");
    Ok(())
}
