//! Sentiment service binary entrypoint.
//! Boots the Axum HTTP server with the lexicon handle, analyzer and metrics.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs when the dev logging gate is open
/// (`SENTIMENT_DEV_LOG=1` in a debug build or a local/dev `SHUTTLE_ENV`).
fn enable_dev_tracing() {
    if !verba_sentiment::sentiment::dev_logging_enabled() {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("verba_sentiment=debug,sentiment=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let router = verba_sentiment::app()
        .await
        .map_err(shuttle_runtime::Error::Custom)?;

    Ok(router.into())
}
