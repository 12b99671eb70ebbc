// src/config/mod.rs
//! Configuration root (`config/sentiment.toml`).
//!
//! Resolution order:
//! 1) `$SENTIMENT_CONFIG_PATH`
//! 2) `config/sentiment.toml`
//! 3) built-in defaults (when neither file exists)
//!
//! Threshold and alpha can be overridden from env after the file is parsed.
//! Everything is validated before an engine is built from it.

pub mod analysis;
pub mod rules;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use analysis::{AnalysisSettings, ConfidenceLevels, TextProcessing, Thresholds, WordLists};
pub use rules::RuleTable;

pub const DEFAULT_SENTIMENT_CONFIG_PATH: &str = "config/sentiment.toml";

pub const ENV_SENTIMENT_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const ENV_POSITIVE_THRESHOLD: &str = "SENTIMENT_POSITIVE_THRESHOLD";
pub const ENV_NEGATIVE_THRESHOLD: &str = "SENTIMENT_NEGATIVE_THRESHOLD";
pub const ENV_NORMALIZATION_ALPHA: &str = "SENTIMENT_NORMALIZATION_ALPHA";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub analysis: AnalysisSettings,
    pub rules: RuleTable,
}

impl SentimentConfig {
    /// Load using env var + fallbacks, then apply env overrides and validate.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_SENTIMENT_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(anyhow!(
                        "{ENV_SENTIMENT_CONFIG_PATH} points to non-existent path {}",
                        path.display()
                    ));
                }
                Self::parse_file(&path)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_SENTIMENT_CONFIG_PATH);
                if path.exists() {
                    Self::parse_file(&path)?
                } else {
                    info!("no sentiment config file found; using built-in defaults");
                    Self::default()
                }
            }
        };
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: SentimentConfig =
            toml::from_str(toml_str).context("parsing sentiment config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.rules.validate()
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading sentiment config from {}", path.display()))?;
        let mut cfg: SentimentConfig = toml::from_str(&content)
            .with_context(|| format!("parsing sentiment config at {}", path.display()))?;
        cfg.resolve_word_list_paths(path);
        info!(path = %path.display(), "sentiment config loaded");
        Ok(cfg)
    }

    /// Relative word-list paths are taken relative to the config file's directory
    /// when they do not exist relative to the working directory.
    fn resolve_word_list_paths(&mut self, config_path: &Path) {
        let Some(base) = config_path.parent() else {
            return;
        };
        let wl = &mut self.analysis.word_lists;
        for p in [&mut wl.positive_path, &mut wl.negative_path]
            .into_iter()
            .flatten()
        {
            if p.is_relative() && !p.exists() {
                let candidate = base.join(&*p);
                if candidate.exists() {
                    *p = candidate;
                }
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_f64_env(std::env::var(ENV_POSITIVE_THRESHOLD).ok()) {
            self.analysis.thresholds.positive = v;
        }
        if let Some(v) = parse_f64_env(std::env::var(ENV_NEGATIVE_THRESHOLD).ok()) {
            self.analysis.thresholds.negative = v;
        }
        if let Some(v) = parse_f64_env(std::env::var(ENV_NORMALIZATION_ALPHA).ok()) {
            self.rules.normalization_alpha = v;
        }
    }
}

// parse optional float env; validation happens afterwards with the rest of the config
fn parse_f64_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
