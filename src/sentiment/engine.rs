// src/sentiment/engine.rs
//! Scoring pipeline: tokenize → phrase overrides → walker → normalize.
//!
//! The engine holds only immutable, pre-compiled state; the lexicon is taken
//! as a snapshot once per call, so concurrent callers never observe a
//! half-refreshed word set.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;

use super::label::{LabelClassifier, SentimentLabel};
use super::normalize::normalize_score;
use super::phrases::{PhraseMatch, PhraseMatcher};
use super::tokenize::{Token, TokenKind, Tokenizer};
use super::walker::{walk, Contribution, WalkRules};
use crate::config::SentimentConfig;
use crate::lexicon::LexiconProvider;

/// Full trace of one scoring call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub tokens: Vec<Token>,
    pub word_count: usize,
    pub phrases: Vec<PhraseMatch>,
    pub contributions: Vec<Contribution>,
    pub contrastive_events: Vec<usize>,
    pub raw_score: f64,
    pub score: f64,
}

pub struct SentimentEngine {
    tokenizer: Tokenizer,
    phrases: PhraseMatcher,
    rules: WalkRules,
    alpha: f64,
    classifier: LabelClassifier,
    lexicon: Arc<dyn LexiconProvider>,
}

impl SentimentEngine {
    /// Validates `config` and compiles everything the hot path needs.
    pub fn new(config: &SentimentConfig, lexicon: Arc<dyn LexiconProvider>) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(
            &config.analysis.text_processing,
            &config.rules.punctuation_breaks,
        )?;
        let phrases = PhraseMatcher::new(&config.rules.phrases, &tokenizer);
        let rules = WalkRules::from_table(&config.rules, |s| tokenizer.fold(s));
        Ok(Self {
            tokenizer,
            phrases,
            rules,
            alpha: config.rules.normalization_alpha,
            classifier: LabelClassifier::new(config.analysis.thresholds),
            lexicon,
        })
    }

    /// Normalized score in [-1, 1]. Blank input is exactly 0.0.
    pub fn calculate_sentiment_score(&self, text: &str) -> f64 {
        self.score_details(text).score
    }

    pub fn determine_sentiment_label(&self, score: f64) -> SentimentLabel {
        self.classifier.determine_sentiment_label(score)
    }

    pub fn score_details(&self, text: &str) -> ScoreBreakdown {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return ScoreBreakdown::default();
        }
        let word_count = tokens.iter().filter(|t| t.kind == TokenKind::Word).count();

        let lexicon = self.lexicon.snapshot();
        let (phrases, phrase_weight, outcome) = {
            let scan = self.phrases.scan(&tokens);
            let outcome = walk(&scan.residual, &lexicon, &self.rules);
            let weight = scan.total_weight();
            (scan.matches, weight, outcome)
        };

        // phrase weights are fixed and never discounted
        let raw_score = phrase_weight + outcome.raw_score();
        let score = normalize_score(raw_score, self.alpha);

        ScoreBreakdown {
            word_count,
            phrases,
            contributions: outcome.contributions,
            contrastive_events: outcome.contrastive_events,
            raw_score,
            score,
            tokens,
        }
    }
}
