// src/sentiment/walker.rs
//! Windowed scoring walker.
//!
//! Walks the residual token stream left to right carrying a small explicit
//! state (pending negation, pending intensity, current contrastive segment).
//! Per token, first match wins:
//!
//! 1. sentence break   → clear negation + intensity, start a new segment
//! 2. contrastive word → discount the whole current segment, clear modifiers,
//!    emphasize the next `contrastive_window` tokens, new segment
//! 3. negation trigger → arm negation for `negation_window` tokens (unless already
//!    active, or the next token is a negation exception such as "only")
//! 4. booster/dampener → arm or merge intensity for `modifier_window` tokens
//! 5. lexicon word     → ±1, scaled by pending intensity (consumed), sign-flipped
//!    while negation is active
//!
//! Every token that does not arm a modifier ticks that modifier's countdown.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::tokenize::Token;
use crate::config::RuleTable;
use crate::lexicon::Lexicon;

/// Rule table with keys folded to the tokenizer's case policy.
#[derive(Debug, Clone)]
pub struct WalkRules {
    boosters: HashMap<String, f64>,
    dampeners: HashMap<String, f64>,
    negations: HashSet<String>,
    negation_exceptions: HashSet<String>,
    contrastives: HashSet<String>,
    negation_window: usize,
    modifier_window: usize,
    contrastive_window: usize,
    contrastive_discount: f64,
    contrastive_emphasis: f64,
}

impl WalkRules {
    pub fn from_table(table: &RuleTable, fold: impl Fn(&str) -> String) -> Self {
        let fold_set = |items: &std::collections::BTreeSet<String>| -> HashSet<String> {
            items.iter().map(|s| fold(s.as_str())).collect()
        };
        Self {
            // boosters always raise the scale, dampeners always lower it
            boosters: table
                .boosters
                .iter()
                .map(|(k, v)| (fold(k.as_str()), v.abs()))
                .collect(),
            dampeners: table
                .dampeners
                .iter()
                .map(|(k, v)| (fold(k.as_str()), -v.abs()))
                .collect(),
            negations: fold_set(&table.negations),
            negation_exceptions: fold_set(&table.negation_exceptions),
            contrastives: fold_set(&table.contrastives),
            negation_window: table.negation_window,
            modifier_window: table.modifier_window,
            contrastive_window: table.contrastive_window,
            contrastive_discount: table.contrastive_discount,
            contrastive_emphasis: table.contrastive_emphasis,
        }
    }
}

/// Pending booster/dampener effect with its remaining lifetime in tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intensity {
    Boost { delta: f64, remaining: usize },
    Damp { delta: f64, remaining: usize },
}

impl Intensity {
    fn new(delta: f64, remaining: usize) -> Self {
        if delta >= 0.0 {
            Intensity::Boost { delta, remaining }
        } else {
            Intensity::Damp { delta, remaining }
        }
    }

    fn delta(&self) -> f64 {
        match *self {
            Intensity::Boost { delta, .. } | Intensity::Damp { delta, .. } => delta,
        }
    }

    /// Stacked modifiers add up and restart the countdown.
    fn merge(current: Option<Self>, delta: f64, window: usize) -> Self {
        let base = current.map_or(0.0, |i| i.delta());
        Self::new(base + delta, window)
    }

    /// Factor applied to the magnitude of the next sentiment word.
    pub fn scale(&self) -> f64 {
        (1.0 + self.delta()).max(0.0)
    }

    fn tick(self) -> Option<Self> {
        match self {
            Intensity::Boost { delta, remaining } => {
                (remaining > 1).then(|| Intensity::Boost { delta, remaining: remaining - 1 })
            }
            Intensity::Damp { delta, remaining } => {
                (remaining > 1).then(|| Intensity::Damp { delta, remaining: remaining - 1 })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Negation {
    remaining: usize,
}

impl Negation {
    fn tick(self) -> Option<Self> {
        (self.remaining > 1).then(|| Negation {
            remaining: self.remaining - 1,
        })
    }
}

/// One sentiment word's effect on the raw score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub index: usize,
    pub token: String,
    /// Final signed value after scaling, negation and contrastive discount.
    pub value: f64,
    pub scale: f64,
    pub negated: bool,
    pub discounted: bool,
    /// Inside the window after a contrastive conjunction.
    pub emphasized: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalkOutcome {
    pub contributions: Vec<Contribution>,
    /// Token indices where a contrastive conjunction fired.
    pub contrastive_events: Vec<usize>,
}

impl WalkOutcome {
    pub fn raw_score(&self) -> f64 {
        self.contributions.iter().map(|c| c.value).sum()
    }
}

/// Per-call walker state.
#[derive(Debug, Default)]
struct WalkState {
    negation: Option<Negation>,
    intensity: Option<Intensity>,
    /// Tokens left in the post-conjunction window.
    after_contrast: usize,
    /// Positions in `contributions` belonging to the current segment.
    segment: Vec<usize>,
    outcome: WalkOutcome,
}

impl WalkState {
    fn reset(&mut self) {
        self.negation = None;
        self.intensity = None;
        self.after_contrast = 0;
        self.segment.clear();
    }

    fn tick_negation(&mut self) {
        self.negation = self.negation.and_then(Negation::tick);
    }

    fn tick_intensity(&mut self) {
        self.intensity = self.intensity.and_then(Intensity::tick);
    }

    /// Whether the current token lies inside the post-conjunction window.
    /// Counts the token against the window.
    fn step_contrast_window(&mut self) -> bool {
        if self.after_contrast == 0 {
            return false;
        }
        self.after_contrast -= 1;
        true
    }

    fn contrast(&mut self, at: usize, rules: &WalkRules) {
        for &pos in &self.segment {
            let c = &mut self.outcome.contributions[pos];
            c.value *= rules.contrastive_discount;
            c.discounted = true;
        }
        self.outcome.contrastive_events.push(at);
        self.reset();
        self.after_contrast = rules.contrastive_window;
    }
}

/// Score the residual tokens. Pure: the same input always gives the same outcome.
pub fn walk(tokens: &[&Token], lexicon: &Lexicon, rules: &WalkRules) -> WalkOutcome {
    let mut st = WalkState::default();

    for (i, tok) in tokens.iter().enumerate() {
        let word = tok.text.as_str();

        if tok.is_break() {
            st.reset();
            continue;
        }

        if rules.contrastives.contains(word) {
            st.contrast(tok.index, rules);
            continue;
        }

        let emphasized = st.step_contrast_window();

        if rules.negations.contains(word) {
            let excepted = tokens
                .get(i + 1)
                .is_some_and(|next| rules.negation_exceptions.contains(&next.text));
            if st.negation.is_none() && !excepted && rules.negation_window > 0 {
                st.negation = Some(Negation {
                    remaining: rules.negation_window,
                });
            } else {
                st.tick_negation();
            }
            st.tick_intensity();
            continue;
        }

        let modifier = rules
            .boosters
            .get(word)
            .or_else(|| rules.dampeners.get(word));
        if let Some(&delta) = modifier {
            if rules.modifier_window > 0 {
                st.intensity = Some(Intensity::merge(st.intensity, delta, rules.modifier_window));
            }
            st.tick_negation();
            continue;
        }

        let polarity = lexicon.polarity(word);
        if polarity != 0 {
            let scale = st.intensity.take().map_or(1.0, |m| m.scale());
            let negated = st.negation.is_some();
            let mut value = f64::from(polarity) * scale;
            if negated {
                value = -value;
            }
            if emphasized {
                value *= rules.contrastive_emphasis;
            }
            st.segment.push(st.outcome.contributions.len());
            st.outcome.contributions.push(Contribution {
                index: tok.index,
                token: tok.text.clone(),
                value,
                scale,
                negated,
                discounted: false,
                emphasized,
            });
            st.tick_negation();
            continue;
        }

        st.tick_negation();
        st.tick_intensity();
    }

    st.outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::tokenize::TokenKind;

    fn toks(text: &str) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(index, w)| Token {
                text: w.to_string(),
                index,
                kind: if w == "." { TokenKind::Break } else { TokenKind::Word },
            })
            .collect()
    }

    fn lex() -> Lexicon {
        Lexicon::new(
            ["good", "great", "merit"],
            ["bad", "terrible", "awful"],
            false,
        )
    }

    fn raw(text: &str) -> f64 {
        raw_with(text, &RuleTable::default())
    }

    fn raw_with(text: &str, table: &RuleTable) -> f64 {
        let rules = WalkRules::from_table(table, |s| s.to_lowercase());
        let t = toks(text);
        let refs: Vec<&Token> = t.iter().collect();
        walk(&refs, &lex(), &rules).raw_score()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn plain_polarity() {
        assert!(approx(raw("good"), 1.0));
        assert!(approx(raw("bad"), -1.0));
        assert!(approx(raw("the weather today"), 0.0));
    }

    #[test]
    fn booster_and_dampener_are_single_use() {
        assert!(approx(raw("extremely good"), 1.30));
        assert!(approx(raw("slightly good"), 0.71));
        assert!(approx(raw("slightly bad"), -0.71));
        // second word is unmodified
        assert!(approx(raw("extremely good good"), 2.30));
    }

    #[test]
    fn stacked_modifiers_add_up() {
        assert!(approx(raw("really very good"), 1.0 + 0.27 + 0.29));
        assert!(approx(raw("very slightly good"), 1.0 + 0.29 - 0.29));
    }

    #[test]
    fn modifier_expires_outside_window() {
        // modifier_window = 2: one filler token still reaches, two do not
        assert!(approx(raw("very the good"), 1.29));
        assert!(approx(raw("very the the good"), 1.0));
    }

    #[test]
    fn negation_window_covers_following_tokens() {
        assert!(approx(raw("not good"), -1.0));
        assert!(approx(raw("not really a good"), -1.0 * 1.27));
        // window 3: fourth token after trigger is outside
        assert!(approx(raw("not a b c good"), 1.0));
        // applies to every sentiment word inside the window
        assert!(approx(raw("not good great"), -2.0));
    }

    #[test]
    fn negation_is_not_rearmed_while_active() {
        // second trigger is ignored, window keeps counting from the first
        assert!(approx(raw("not never x y good"), 1.0));
        assert!(approx(raw("not never good"), -1.0));
    }

    #[test]
    fn negation_exceptions() {
        assert!(approx(raw("not only good"), 1.0));
        assert!(approx(raw("not without merit"), 1.0));
    }

    #[test]
    fn break_resets_state() {
        assert!(approx(raw("not . good"), 1.0));
        assert!(approx(raw("extremely . good"), 1.0));
    }

    #[test]
    fn contrastive_discounts_segment_and_emphasizes_what_follows() {
        assert!(approx(raw("good but terrible"), 0.5 - 1.2));
        assert!(approx(raw("terrible but good"), -0.5 + 1.2));
        // clears pending negation at the clause boundary
        assert!(approx(raw("not good but great"), -0.5 + 1.2));
    }

    #[test]
    fn long_first_clause_is_still_discounted() {
        // 13 tokens before "but", more than the default window of 10
        let text = "the food was good and the room had a view and it was nice but terrible";
        let table = RuleTable::default();
        let rules = WalkRules::from_table(&table, |s| s.to_lowercase());
        let t = toks(text);
        let refs: Vec<&Token> = t.iter().collect();
        let out = walk(&refs, &lex(), &rules);
        assert!(out.contributions[0].discounted);
        assert!(approx(out.raw_score(), 0.5 - 1.2));
        assert!(out.raw_score() < 0.0);
    }

    #[test]
    fn contrastive_window_bounds_emphasis() {
        let mut table = RuleTable::default();
        table.contrastive_window = 2;
        // "bad" is the second token after "but": inside the window
        assert!(approx(raw_with("good but x bad", &table), 0.5 - 1.2));
        // third token after "but": plain weight, prefix still discounted
        assert!(approx(raw_with("good but x y bad", &table), 0.5 - 1.0));
    }

    #[test]
    fn break_closes_contrastive_window() {
        // "good" belongs to the previous sentence and is not discounted
        assert!(approx(raw("good . but bad"), 1.0 - 1.2));
        assert!(approx(raw("good but . bad"), 0.5 - 1.0));
    }

    #[test]
    fn outcome_records_details() {
        let rules = WalkRules::from_table(&RuleTable::default(), |s| s.to_lowercase());
        let t = toks("not very good but bad");
        let refs: Vec<&Token> = t.iter().collect();
        let out = walk(&refs, &lex(), &rules);
        assert_eq!(out.contrastive_events, vec![3]);
        assert_eq!(out.contributions.len(), 2);
        let first = &out.contributions[0];
        assert!(first.negated && first.discounted);
        assert!(approx(first.scale, 1.29));
        assert!(approx(first.value, -1.29 * 0.5));
        let second = &out.contributions[1];
        assert!(second.emphasized && !second.discounted);
        assert!(approx(second.value, -1.2));
    }
}
