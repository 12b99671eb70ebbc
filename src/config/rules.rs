// src/config/rules.rs
//! Rule table: modifier dictionaries, phrase overrides and window sizes.
//!
//! TOML shape (every key optional, defaults below):
//! ```toml
//! [rules]
//! negation_window = 3
//! contrastive_window = 10
//! modifier_window = 2
//! normalization_alpha = 3.0
//! contrastive_discount = 0.5
//! contrastive_emphasis = 1.2
//! contrastives = ["but", "however"]
//!
//! [rules.boosters]
//! extremely = 0.30
//!
//! [rules.phrases]
//! "waste of time" = -1.5
//! ```

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const DEFAULT_NEGATION_WINDOW: usize = 3;
pub const DEFAULT_CONTRASTIVE_WINDOW: usize = 10;
pub const DEFAULT_MODIFIER_WINDOW: usize = 2;
pub const DEFAULT_NORMALIZATION_ALPHA: f64 = 3.0;
pub const DEFAULT_CONTRASTIVE_DISCOUNT: f64 = 0.5;
pub const DEFAULT_CONTRASTIVE_EMPHASIS: f64 = 1.2;

/// Immutable rule configuration consumed by the scoring core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    /// Intensifiers: word → positive delta added to the magnitude scale.
    pub boosters: HashMap<String, f64>,
    /// Diminishers: word → delta (conventionally negative) taken off the magnitude scale.
    pub dampeners: HashMap<String, f64>,
    pub negations: BTreeSet<String>,
    /// Words following a negation trigger that cancel it ("not only", "not without").
    pub negation_exceptions: BTreeSet<String>,
    pub contrastives: BTreeSet<String>,
    pub punctuation_breaks: BTreeSet<String>,
    /// Multi-word overrides with a fixed weight. Ordered so equal-length ties are deterministic.
    pub phrases: BTreeMap<String, f64>,
    pub negation_window: usize,
    pub contrastive_window: usize,
    pub modifier_window: usize,
    pub normalization_alpha: f64,
    /// Fraction kept of the pre-conjunction contributions on a contrastive event.
    pub contrastive_discount: f64,
    /// Factor applied to contributions within `contrastive_window` tokens after a conjunction.
    pub contrastive_emphasis: f64,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            boosters: owned_map(&[
                ("extremely", 0.30),
                ("very", 0.29),
                ("really", 0.27),
                ("highly", 0.27),
                ("so", 0.25),
                ("totally", 0.25),
                ("completely", 0.25),
                ("utterly", 0.25),
                ("absolutely", 0.25),
                ("incredibly", 0.30),
                ("too", 0.20),
            ]),
            dampeners: owned_map(&[
                ("slightly", -0.29),
                ("somewhat", -0.27),
                ("bit", -0.25),
                ("little", -0.25),
                ("mildly", -0.25),
                ("rather", -0.20),
                ("fairly", -0.20),
                ("kinda", -0.20),
                ("quite", -0.15),
                ("average", -0.10),
            ]),
            negations: owned_set(&[
                "not", "no", "never", "none", "nobody", "nothing", "neither", "nowhere",
                "hardly", "scarcely", "barely", "isnt", "isn't", "arent", "aren't", "wasnt",
                "wasn't", "werent", "weren't", "dont", "don't", "doesnt", "doesn't", "didnt",
                "didn't", "cant", "can't", "cannot", "couldnt", "couldn't", "wont", "won't",
                "wouldnt", "wouldn't", "shouldnt", "shouldn't", "hasnt", "hasn't", "havent",
                "haven't", "hadnt", "hadn't",
            ]),
            negation_exceptions: owned_set(&["only", "without"]),
            contrastives: owned_set(&["but", "however", "though", "yet"]),
            punctuation_breaks: owned_set(&[".", "!", "?", ";"]),
            phrases: [
                ("waste of time", -1.5),
                ("poorly communicated", -1.0),
                ("customer support unresponsive", -1.2),
                ("fell apart", -1.2),
                ("not good", -0.8),
                ("worth recommending", 0.6),
                ("hard to believe", -0.8),
                ("total disappointment", -1.5),
                ("more bugs than it fixed", -1.3),
                ("performance has drastically worsened", -1.4),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect(),
            negation_window: DEFAULT_NEGATION_WINDOW,
            contrastive_window: DEFAULT_CONTRASTIVE_WINDOW,
            modifier_window: DEFAULT_MODIFIER_WINDOW,
            normalization_alpha: DEFAULT_NORMALIZATION_ALPHA,
            contrastive_discount: DEFAULT_CONTRASTIVE_DISCOUNT,
            contrastive_emphasis: DEFAULT_CONTRASTIVE_EMPHASIS,
        }
    }
}

impl RuleTable {
    /// Reject tables the scoring core must never see.
    pub fn validate(&self) -> Result<()> {
        if !self.normalization_alpha.is_finite() || self.normalization_alpha <= 0.0 {
            bail!(
                "rules.normalization_alpha must be a finite value > 0 (got {})",
                self.normalization_alpha
            );
        }
        if self.negation_window == 0 {
            bail!("rules.negation_window must be > 0");
        }
        if self.contrastive_window == 0 {
            bail!("rules.contrastive_window must be > 0");
        }
        if self.modifier_window == 0 {
            bail!("rules.modifier_window must be > 0");
        }
        if !(0.0..1.0).contains(&self.contrastive_discount) {
            bail!(
                "rules.contrastive_discount must lie in [0, 1) (got {})",
                self.contrastive_discount
            );
        }
        if !self.contrastive_emphasis.is_finite() || self.contrastive_emphasis < 1.0 {
            bail!(
                "rules.contrastive_emphasis must be a finite value >= 1 (got {})",
                self.contrastive_emphasis
            );
        }
        for (section, map) in [("boosters", &self.boosters), ("dampeners", &self.dampeners)] {
            if let Some((w, v)) = map.iter().find(|(_, v)| !v.is_finite()) {
                bail!("rules.{section}.{w} is not a finite number ({v})");
            }
        }
        if let Some((p, v)) = self.phrases.iter().find(|(_, v)| !v.is_finite()) {
            bail!("rules.phrases.\"{p}\" is not a finite number ({v})");
        }
        if self.punctuation_breaks.iter().any(|p| p.chars().count() != 1) {
            bail!("rules.punctuation_breaks entries must be single characters");
        }
        Ok(())
    }
}

fn owned_map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn owned_set(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_populated() {
        let r = RuleTable::default();
        r.validate().expect("defaults must validate");
        assert!(!r.boosters.is_empty());
        assert!(!r.dampeners.is_empty());
        assert!(!r.contrastives.is_empty());
        assert!(!r.punctuation_breaks.is_empty());
        assert!(r.dampeners.values().all(|v| *v < 0.0));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let r: RuleTable = toml::from_str("negation_window = 5\n[boosters]\nmega = 0.5\n").unwrap();
        assert_eq!(r.negation_window, 5);
        assert_eq!(r.contrastive_window, DEFAULT_CONTRASTIVE_WINDOW);
        assert_eq!(r.boosters.len(), 1);
        assert!(r.negations.contains("not"));
    }

    #[test]
    fn rejects_bad_alpha_and_windows() {
        let mut r = RuleTable::default();
        r.normalization_alpha = 0.0;
        assert!(r.validate().is_err());

        let mut r = RuleTable::default();
        r.normalization_alpha = f64::NAN;
        assert!(r.validate().is_err());

        let mut r = RuleTable::default();
        r.negation_window = 0;
        assert!(r.validate().is_err());

        let mut r = RuleTable::default();
        r.contrastive_discount = 1.0;
        assert!(r.validate().is_err());

        let mut r = RuleTable::default();
        r.contrastive_emphasis = 0.8;
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_multi_char_breaks() {
        let mut r = RuleTable::default();
        r.punctuation_breaks.insert("...".into());
        assert!(r.validate().is_err());
    }
}
