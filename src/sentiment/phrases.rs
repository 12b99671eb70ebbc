// src/sentiment/phrases.rs
//! Fixed-weight phrase overrides, matched on the normalized token sequence
//! before the walker runs.
//!
//! - Longest phrase wins at a start position; equal lengths keep table order.
//! - Matches never overlap; the scan resumes after a matched span.
//! - Matched tokens are removed from the residual stream.

use serde::Serialize;
use std::collections::BTreeMap;

use super::tokenize::{Token, Tokenizer};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseMatch {
    pub phrase: String,
    pub weight: f64,
    /// Index of the first matched token.
    pub start: usize,
    /// Number of tokens covered.
    pub len: usize,
}

#[derive(Debug, Clone)]
struct CompiledPhrase {
    text: String,
    words: Vec<String>,
    weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    // sorted by word count, longest first; stable so table order breaks ties
    phrases: Vec<CompiledPhrase>,
}

/// Output of a phrase scan: matched spans plus the tokens left for the walker.
#[derive(Debug)]
pub struct PhraseScan<'a> {
    pub matches: Vec<PhraseMatch>,
    pub residual: Vec<&'a Token>,
}

impl PhraseScan<'_> {
    pub fn total_weight(&self) -> f64 {
        self.matches.iter().map(|m| m.weight).sum()
    }
}

impl PhraseMatcher {
    /// Compile phrase keys with the same tokenizer used for input text.
    pub fn new(phrases: &BTreeMap<String, f64>, tokenizer: &Tokenizer) -> Self {
        let mut compiled: Vec<CompiledPhrase> = phrases
            .iter()
            .filter_map(|(text, &weight)| {
                let words: Vec<String> = tokenizer
                    .tokenize(text)
                    .into_iter()
                    .map(|t| t.text)
                    .collect();
                if words.is_empty() {
                    return None;
                }
                Some(CompiledPhrase {
                    text: text.clone(),
                    words,
                    weight,
                })
            })
            .collect();
        compiled.sort_by(|a, b| b.words.len().cmp(&a.words.len()));
        Self { phrases: compiled }
    }

    pub fn scan<'a>(&self, tokens: &'a [Token]) -> PhraseScan<'a> {
        let mut matches = Vec::new();
        let mut residual = Vec::with_capacity(tokens.len());

        let mut i = 0;
        while i < tokens.len() {
            match self.longest_at(tokens, i) {
                Some(p) => {
                    matches.push(PhraseMatch {
                        phrase: p.text.clone(),
                        weight: p.weight,
                        start: tokens[i].index,
                        len: p.words.len(),
                    });
                    i += p.words.len();
                }
                None => {
                    residual.push(&tokens[i]);
                    i += 1;
                }
            }
        }

        PhraseScan { matches, residual }
    }

    fn longest_at(&self, tokens: &[Token], start: usize) -> Option<&CompiledPhrase> {
        let rest = &tokens[start..];
        self.phrases.iter().find(|p| {
            p.words.len() <= rest.len() && p.words.iter().zip(rest).all(|(w, t)| *w == t.text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextProcessing;

    fn tokenizer() -> Tokenizer {
        let breaks = [".".to_string()].into_iter().collect();
        Tokenizer::new(&TextProcessing::default(), &breaks).unwrap()
    }

    fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn matches_and_removes_span() {
        let t = tokenizer();
        let m = PhraseMatcher::new(&table(&[("waste of time", -1.5)]), &t);
        let toks = t.tokenize("What a Waste of time, honestly");
        let scan = m.scan(&toks);
        assert_eq!(scan.matches.len(), 1);
        assert_eq!(scan.matches[0].start, 2);
        assert_eq!(scan.matches[0].len, 3);
        assert!((scan.total_weight() + 1.5).abs() < 1e-12);
        let left: Vec<&str> = scan.residual.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(left, vec!["what", "a", "honestly"]);
    }

    #[test]
    fn longest_match_wins() {
        let t = tokenizer();
        let m = PhraseMatcher::new(
            &table(&[("not good", -0.8), ("not good enough", -1.1)]),
            &t,
        );
        let toks = t.tokenize("not good enough");
        let scan = m.scan(&toks);
        assert_eq!(scan.matches.len(), 1);
        assert_eq!(scan.matches[0].phrase, "not good enough");
        assert!(scan.residual.is_empty());
    }

    #[test]
    fn equal_length_tie_uses_table_order() {
        let t = tokenizer();
        // both compile to ["fell", "apart"]; BTreeMap order puts "Fell apart" first
        let m = PhraseMatcher::new(&table(&[("fell apart", -1.2), ("Fell apart", -9.0)]), &t);
        let toks = t.tokenize("it fell apart");
        let scan = m.scan(&toks);
        assert_eq!(scan.matches.len(), 1);
        assert_eq!(scan.matches[0].phrase, "Fell apart");
    }

    #[test]
    fn repeated_and_non_overlapping() {
        let t = tokenizer();
        let m = PhraseMatcher::new(&table(&[("fell apart", -1.2)]), &t);
        let toks = t.tokenize("fell apart. fell apart");
        let scan = m.scan(&toks);
        assert_eq!(scan.matches.len(), 2);
        assert!((scan.total_weight() + 2.4).abs() < 1e-12);
        assert_eq!(scan.residual.len(), 1);
        assert!(scan.residual[0].is_break());
    }

    #[test]
    fn phrase_does_not_cross_sentence_break() {
        let t = tokenizer();
        let m = PhraseMatcher::new(&table(&[("not good", -0.8)]), &t);
        let toks = t.tokenize("not. good");
        assert!(m.scan(&toks).matches.is_empty());
    }
}
