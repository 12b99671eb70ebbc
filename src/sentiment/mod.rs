// src/sentiment/mod.rs
//! Sentiment analysis service: wraps the scoring engine with labels,
//! confidence, dev logging and metrics.

pub mod confidence;
pub mod engine;
pub mod label;
pub mod normalize;
pub mod phrases;
pub mod tokenize;
pub mod walker;

use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub use confidence::{estimate_confidence, ConfidenceLevel};
pub use engine::{ScoreBreakdown, SentimentEngine};
pub use label::{LabelClassifier, SentimentLabel};
pub use normalize::normalize_score;
pub use tokenize::{Token, TokenKind, Tokenizer};

use crate::config::{ConfidenceLevels, SentimentConfig};
use crate::lexicon::LexiconProvider;

pub const ENV_DEV_LOG: &str = "SENTIMENT_DEV_LOG";

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sentiment_requests_total", "Texts scored by the analyzer.");
        describe_counter!(
            "sentiment_label_total",
            "Scored texts by assigned label."
        );
        describe_histogram!("sentiment_score", "Normalized sentiment scores.");
        describe_counter!(
            "sentiment_lexicon_reloads_total",
            "Successful lexicon swaps."
        );
    });
}

// Dev logging gate: SENTIMENT_DEV_LOG=1 AND dev env (debug or SHUTTLE_ENV in {local,development,dev})
pub fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var("SHUTTLE_ENV")
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// Short stable id for a text, so dev logs never carry the text itself.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub score: f64,
}

impl SentimentResult {
    pub fn confidence_level(&self, levels: &ConfidenceLevels) -> Option<ConfidenceLevel> {
        self.confidence
            .map(|c| ConfidenceLevel::from_confidence(c, levels))
    }
}

pub struct SentimentAnalyzer {
    engine: SentimentEngine,
    confidence_levels: ConfidenceLevels,
}

impl SentimentAnalyzer {
    pub fn new(engine: SentimentEngine, confidence_levels: ConfidenceLevels) -> Self {
        ensure_metrics_described();
        Self {
            engine,
            confidence_levels,
        }
    }

    pub fn from_config(config: &SentimentConfig, lexicon: Arc<dyn LexiconProvider>) -> Result<Self> {
        let engine = SentimentEngine::new(config, lexicon)?;
        info!(
            positive_threshold = config.analysis.thresholds.positive,
            negative_threshold = config.analysis.thresholds.negative,
            alpha = config.rules.normalization_alpha,
            phrases = config.rules.phrases.len(),
            "sentiment analyzer ready"
        );
        Ok(Self::new(engine, config.analysis.confidence_levels))
    }

    pub fn engine(&self) -> &SentimentEngine {
        &self.engine
    }

    pub fn confidence_levels(&self) -> &ConfidenceLevels {
        &self.confidence_levels
    }

    /// Score, label and confidence.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        self.analyze_with(text, true)
    }

    pub fn analyze_with(&self, text: &str, include_confidence: bool) -> SentimentResult {
        self.analyze_detailed(text, include_confidence).0
    }

    /// Like `analyze_with`, also returning the scoring trace.
    pub fn analyze_detailed(
        &self,
        text: &str,
        include_confidence: bool,
    ) -> (SentimentResult, ScoreBreakdown) {
        let details = self.engine.score_details(text);
        let label = self.engine.determine_sentiment_label(details.score);

        let confidence = include_confidence.then(|| {
            if details.tokens.is_empty() {
                1.0
            } else {
                estimate_confidence(details.score, details.word_count)
            }
        });

        let result = SentimentResult {
            label,
            confidence,
            score: details.score,
        };

        counter!("sentiment_requests_total").increment(1);
        counter!("sentiment_label_total", "label" => label.as_str()).increment(1);
        histogram!("sentiment_score").record(result.score);

        debug!(
            score = result.score,
            label = %label,
            words = details.word_count,
            phrases = details.phrases.len(),
            "sentiment analyzed"
        );
        if dev_logging_enabled() {
            // Never log raw text. Only hashed id + counts.
            info!(
                target: "sentiment",
                id = %anon_hash(text),
                raw = details.raw_score,
                score = result.score,
                contrastive = details.contrastive_events.len(),
                "dev: analyzed"
            );
        }

        (result, details)
    }
}
