// src/sentiment/label.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold classifier. Both boundaries are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct LabelClassifier {
    thresholds: Thresholds,
}

impl LabelClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn determine_sentiment_label(&self, score: f64) -> SentimentLabel {
        if score >= self.thresholds.positive {
            SentimentLabel::Positive
        } else if score <= self.thresholds.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}
