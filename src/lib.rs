// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod lexicon;
pub mod metrics;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::{RuleTable, SentimentConfig};
pub use crate::lexicon::{Lexicon, LexiconHandle, LexiconProvider};
pub use crate::sentiment::{
    SentimentAnalyzer, SentimentEngine, SentimentLabel, SentimentResult,
};

use shuttle_axum::axum::Router;
use tracing::info;

/// Build the full in-process app: config from env/file, lexicon handle,
/// API routes and `/metrics`.
pub async fn app() -> anyhow::Result<Router> {
    // recorder first so metric descriptions land in it
    let metrics = crate::metrics::Metrics::init()?;
    let config = SentimentConfig::load()?;
    let state = AppState::from_config(&config)?;
    lexicon::start_hot_reload_thread(state.lexicon.clone());
    info!("sentiment app assembled");
    Ok(router(state).merge(metrics.router()))
}
