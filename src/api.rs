// src/api.rs
//! HTTP surface for the sentiment service.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::config::SentimentConfig;
use crate::lexicon::LexiconHandle;
use crate::sentiment::{ConfidenceLevel, ScoreBreakdown, SentimentAnalyzer, SentimentLabel};

/// Shared app state used by Axum.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SentimentAnalyzer>,
    pub lexicon: LexiconHandle,
}

impl AppState {
    /// Build the lexicon handle from the configured word lists and an analyzer
    /// that scores against it.
    pub fn from_config(config: &SentimentConfig) -> Result<Self> {
        let lexicon = LexiconHandle::from_sources(
            config.analysis.word_lists.clone(),
            config.analysis.text_processing.case_sensitive,
        );
        let analyzer = SentimentAnalyzer::from_config(config, Arc::new(lexicon.clone()))?;
        Ok(Self {
            analyzer: Arc::new(analyzer),
            lexicon,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/batch", post(analyze_batch))
        .route("/label", get(label_for_score))
        .route("/admin/reload-lexicon", post(admin_reload_lexicon))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct AnalyzeReq {
    // missing or null text scores like blank text
    #[serde(default)]
    text: Option<String>,
    #[serde(default = "default_true")]
    include_confidence: bool,
    #[serde(default)]
    explain: bool,
}

#[derive(Serialize)]
struct AnalyzeResp {
    label: SentimentLabel,
    score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_level: Option<ConfidenceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdown: Option<ScoreBreakdown>,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Json<AnalyzeResp> {
    let text = body.text.as_deref().unwrap_or("");
    let (result, details) = state.analyzer.analyze_detailed(text, body.include_confidence);
    Json(AnalyzeResp {
        label: result.label,
        score: result.score,
        confidence: result.confidence,
        confidence_level: result.confidence_level(state.analyzer.confidence_levels()),
        breakdown: body.explain.then_some(details),
    })
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct BatchOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    label: SentimentLabel,
    score: f64,
    confidence: Option<f64>,
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<BatchItem>>,
) -> Json<Vec<BatchOut>> {
    let out = items
        .into_iter()
        .map(|it| {
            let r = state.analyzer.analyze(it.text.as_deref().unwrap_or(""));
            BatchOut {
                id: it.id,
                label: r.label,
                score: r.score,
                confidence: r.confidence,
            }
        })
        .collect::<Vec<_>>();
    Json(out)
}

#[derive(Deserialize)]
struct LabelQuery {
    score: f64,
}

#[derive(Serialize)]
struct LabelOut {
    score: f64,
    label: SentimentLabel,
}

async fn label_for_score(
    State(state): State<AppState>,
    Query(q): Query<LabelQuery>,
) -> Json<LabelOut> {
    Json(LabelOut {
        score: q.score,
        label: state.analyzer.engine().determine_sentiment_label(q.score),
    })
}

#[derive(Serialize)]
struct ReloadOut {
    status: &'static str,
    positive: usize,
    negative: usize,
}

async fn admin_reload_lexicon(
    State(state): State<AppState>,
) -> Result<Json<ReloadOut>, (StatusCode, String)> {
    let handle = state.lexicon.clone();
    // file IO; keep it off the async workers
    let (positive, negative) = tokio::task::spawn_blocking(move || handle.reload())
        .await
        .map_err(|e| {
            warn!(error = %e, "lexicon reload task failed; current lexicon kept");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("reload failed: {e}"))
        })?;
    Ok(Json(ReloadOut {
        status: "reloaded",
        positive,
        negative,
    }))
}
