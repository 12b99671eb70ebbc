// src/sentiment/tokenize.rs
//! Config-driven tokenizer: hyphen handling, separator regex, case folding and
//! punctuation peeling. Sentence-break symbols survive as their own tokens so
//! the walker can reset state on them.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use crate::config::TextProcessing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Word,
    Break,
}

/// A normalized unit of text with its position in the full token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub index: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn is_break(&self) -> bool {
        self.kind == TokenKind::Break
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    separator: Regex,
    case_sensitive: bool,
    normalize_hyphens: bool,
    breaks: HashSet<char>,
}

impl Tokenizer {
    pub fn new(settings: &TextProcessing, punctuation_breaks: &BTreeSet<String>) -> Result<Self> {
        let separator = Regex::new(&settings.word_separator).with_context(|| {
            format!("compiling word separator `{}`", settings.word_separator)
        })?;
        Ok(Self {
            separator,
            case_sensitive: settings.case_sensitive,
            normalize_hyphens: settings.normalize_hyphens,
            breaks: punctuation_breaks
                .iter()
                .filter_map(|s| s.chars().next())
                .collect(),
        })
    }

    /// Apply the case policy to a dictionary key so lookups match tokens.
    pub fn fold(&self, s: &str) -> String {
        let s = s.trim();
        if self.case_sensitive {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }

    /// Blank input yields no tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut prepared = if self.normalize_hyphens {
            text.replace('-', " ")
        } else {
            text.to_string()
        };
        if !self.case_sensitive {
            prepared = prepared.to_lowercase();
        }

        let mut out = Vec::new();
        for piece in self.separator.split(prepared.trim()) {
            if !piece.is_empty() {
                self.peel(piece, &mut out);
            }
        }
        out
    }

    /// Split one raw piece into (leading breaks, word core, trailing breaks).
    /// Non-break punctuation at the edges is dropped; inner punctuation stays.
    fn peel(&self, piece: &str, out: &mut Vec<Token>) {
        let first = piece.char_indices().find(|(_, c)| c.is_alphanumeric());
        let last = piece.char_indices().rev().find(|(_, c)| c.is_alphanumeric());

        let (Some((start, _)), Some((end, end_ch))) = (first, last) else {
            self.push_breaks(piece, out);
            return;
        };
        let end = end + end_ch.len_utf8();

        self.push_breaks(&piece[..start], out);
        let index = out.len();
        out.push(Token {
            text: piece[start..end].to_string(),
            index,
            kind: TokenKind::Word,
        });
        self.push_breaks(&piece[end..], out);
    }

    fn push_breaks(&self, punct: &str, out: &mut Vec<Token>) {
        for ch in punct.chars().filter(|c| self.breaks.contains(c)) {
            let index = out.len();
            out.push(Token {
                text: ch.to_string(),
                index,
                kind: TokenKind::Break,
            });
        }
    }
}
