// src/sentiment/confidence.rs
//! Heuristic confidence from score magnitude and text length.

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceLevels;

const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

/// Confidence in [0.1, 0.95]. Stronger scores and longer texts raise it.
pub fn estimate_confidence(score: f64, word_count: usize) -> f64 {
    let magnitude = if score.is_finite() { score.abs() } else { 0.0 };
    let base = (0.1 + magnitude * 0.8).min(0.9);
    let length_factor = (0.3 + word_count as f64 / 15.0).min(0.8);
    (base * length_factor).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64, levels: &ConfidenceLevels) -> Self {
        if confidence >= levels.high {
            ConfidenceLevel::High
        } else if confidence >= levels.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}
