// src/config/analysis.rs
//! Text-processing switches, label thresholds, confidence levels and word-list sources.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_WORD_SEPARATOR: &str = r"\s+";
pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = -0.1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub text_processing: TextProcessing,
    pub thresholds: Thresholds,
    pub confidence_levels: ConfidenceLevels,
    pub word_lists: WordLists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProcessing {
    /// Regex used to split text into raw pieces.
    pub word_separator: String,
    pub case_sensitive: bool,
    /// Replace `-` with a space before splitting ("state-of-the-art" → four words).
    pub normalize_hyphens: bool,
}

impl Default for TextProcessing {
    fn default() -> Self {
        Self {
            word_separator: DEFAULT_WORD_SEPARATOR.to_string(),
            case_sensitive: false,
            normalize_hyphens: true,
        }
    }
}

/// Inclusive label boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE_THRESHOLD,
            negative: DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceLevels {
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceLevels {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.6,
        }
    }
}

/// Word-list sources. A file wins when it yields at least one word;
/// otherwise the inline list is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLists {
    pub positive_path: Option<PathBuf>,
    pub negative_path: Option<PathBuf>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for WordLists {
    fn default() -> Self {
        Self {
            positive_path: None,
            negative_path: None,
            positive: [
                "good", "great", "excellent", "amazing", "awesome", "best", "happy", "love",
                "wonderful", "fantastic", "nice", "perfect", "pleasant", "helpful", "reliable",
                "recommend", "impressive", "enjoy", "merit", "satisfied",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            negative: [
                "bad", "terrible", "awful", "horrible", "worst", "sad", "hate", "poor", "broken",
                "useless", "disappointing", "disappointed", "slow", "angry", "annoying", "buggy",
                "unreliable", "fail", "failed", "boring",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<()> {
        Regex::new(&self.text_processing.word_separator).with_context(|| {
            format!(
                "analysis.text_processing.word_separator is not a valid regex: {}",
                self.text_processing.word_separator
            )
        })?;

        let t = self.thresholds;
        if !t.positive.is_finite() || !t.negative.is_finite() {
            bail!("analysis.thresholds must be finite numbers");
        }
        if t.positive <= t.negative {
            bail!(
                "analysis.thresholds.positive ({}) must be greater than negative ({})",
                t.positive,
                t.negative
            );
        }

        let c = self.confidence_levels;
        if !(0.0..=1.0).contains(&c.medium) || !(0.0..=1.0).contains(&c.high) || c.medium > c.high
        {
            bail!(
                "analysis.confidence_levels must satisfy 0 <= medium ({}) <= high ({}) <= 1",
                c.medium,
                c.high
            );
        }
        Ok(())
    }
}
