// src/lexicon.rs
//! Positive/negative word sets, the provider seam used by the scoring core,
//! and a thread-safe handle that swaps whole lexicons atomically.
//!
//! A `Lexicon` is immutable once built. Refreshing means building a new one
//! from the configured word lists and replacing the `Arc` inside the handle;
//! in-flight scoring keeps the snapshot it started with.

use anyhow::{Context, Result};
use metrics::counter;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::config::WordLists;

pub const ENV_HOT_RELOAD: &str = "SENTIMENT_HOT_RELOAD";

/// Case-normalized positive and negative word sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Lexicon {
    /// Build from raw word lists. Entries are trimmed, blanks dropped, and
    /// lowercased unless `case_sensitive`.
    pub fn new<P, N>(positive: P, negative: N, case_sensitive: bool) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let lex = Self {
            positive: to_processed_set(positive, case_sensitive),
            negative: to_processed_set(negative, case_sensitive),
        };
        let overlap = lex.overlap();
        if !overlap.is_empty() {
            warn!(
                count = overlap.len(),
                words = ?overlap.iter().take(5).collect::<Vec<_>>(),
                "words found in both positive and negative lexicons; they will score 0"
            );
        }
        lex
    }

    pub fn positive_words(&self) -> &HashSet<String> {
        &self.positive
    }

    pub fn negative_words(&self) -> &HashSet<String> {
        &self.negative
    }

    /// +1 / -1 / 0 for a (case-normalized) token. Words in both sets are 0.
    pub fn polarity(&self, token: &str) -> i8 {
        match (self.positive.contains(token), self.negative.contains(token)) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.positive.contains(token) || self.negative.contains(token)
    }

    fn overlap(&self) -> Vec<&String> {
        let mut v: Vec<&String> = self.positive.intersection(&self.negative).collect();
        v.sort();
        v
    }
}

fn to_processed_set<I>(words: I, case_sensitive: bool) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_string())
        .filter(|w| !w.is_empty())
        .map(|w| if case_sensitive { w } else { w.to_lowercase() })
        .collect()
}

/// Source of the lexicon the engine scores against.
pub trait LexiconProvider: Send + Sync {
    /// A complete, immutable lexicon. Callers hold it for the whole scoring call.
    fn snapshot(&self) -> Arc<Lexicon>;
}

impl LexiconProvider for Arc<Lexicon> {
    fn snapshot(&self) -> Arc<Lexicon> {
        Arc::clone(self)
    }
}

/* ----------------------------
Word-list loading
---------------------------- */

/// Read one word per line; trims, skips blank lines and `#` comments.
pub fn load_word_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading word list from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Resolve one list: file first, inline fallback when the file is absent,
/// unreadable or empty.
fn resolve_list(path: Option<&Path>, inline: &[String], label: &str) -> Vec<String> {
    let Some(path) = path else {
        return inline.to_vec();
    };
    match load_word_list(path) {
        Ok(words) if !words.is_empty() => words,
        Ok(_) => {
            warn!(list = label, path = %path.display(), "word list file is empty; using inline list");
            inline.to_vec()
        }
        Err(e) => {
            warn!(list = label, error = %e, "word list file unavailable; using inline list");
            inline.to_vec()
        }
    }
}

/// Build a lexicon from configured sources.
pub fn build_lexicon(lists: &WordLists, case_sensitive: bool) -> Lexicon {
    let started = std::time::Instant::now();
    let positive = resolve_list(lists.positive_path.as_deref(), &lists.positive, "positive");
    let negative = resolve_list(lists.negative_path.as_deref(), &lists.negative, "negative");
    let lex = Lexicon::new(positive, negative, case_sensitive);
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        positive = lex.positive.len(),
        negative = lex.negative.len(),
        "lexicon built"
    );
    lex
}

/* ----------------------------
Thread-safe handle + refresh
---------------------------- */

/// Shared, swappable lexicon. Cloning the handle shares the same slot.
#[derive(Clone)]
pub struct LexiconHandle {
    inner: Arc<RwLock<Arc<Lexicon>>>,
    sources: Option<Arc<WordLists>>,
    case_sensitive: bool,
}

impl LexiconHandle {
    /// Build the initial lexicon from `sources`.
    pub fn from_sources(sources: WordLists, case_sensitive: bool) -> Self {
        let lex = build_lexicon(&sources, case_sensitive);
        Self {
            inner: Arc::new(RwLock::new(Arc::new(lex))),
            sources: Some(Arc::new(sources)),
            case_sensitive,
        }
    }

    /// Wrap an already built lexicon. Without sources, `reload` keeps the current one.
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(lexicon))),
            sources: None,
            case_sensitive: false,
        }
    }

    /// Swap in a fully built lexicon.
    pub fn replace(&self, lexicon: Lexicon) {
        let fresh = Arc::new(lexicon);
        match self.inner.write() {
            Ok(mut guard) => *guard = fresh,
            // The slot always holds a complete Arc, so a poisoned lock is still usable.
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    /// Rebuild from the configured sources and swap. Returns (positive, negative) sizes.
    pub fn reload(&self) -> (usize, usize) {
        let Some(sources) = &self.sources else {
            let current = self.snapshot();
            debug!("lexicon handle has no word-list sources; reload skipped");
            return (current.positive.len(), current.negative.len());
        };
        let lex = build_lexicon(sources, self.case_sensitive);
        let sizes = (lex.positive.len(), lex.negative.len());
        self.replace(lex);
        counter!("sentiment_lexicon_reloads_total").increment(1);
        info!(positive = sizes.0, negative = sizes.1, "lexicon reloaded");
        sizes
    }

    fn watched_paths(&self) -> Vec<PathBuf> {
        self.sources
            .iter()
            .flat_map(|s| [s.positive_path.clone(), s.negative_path.clone()])
            .flatten()
            .collect()
    }
}

impl LexiconProvider for LexiconHandle {
    fn snapshot(&self) -> Arc<Lexicon> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }
}

/// Returns true if word-list hot reload was requested (`SENTIMENT_HOT_RELOAD=1`).
fn hot_reload_enabled() -> bool {
    std::env::var(ENV_HOT_RELOAD)
        .ok()
        .is_some_and(|v| v == "1")
}

/// Start a polling watcher on the configured word-list files.
/// Polls mtimes every 2s and reloads the handle when any of them changes.
pub fn start_hot_reload_thread(handle: LexiconHandle) {
    if !hot_reload_enabled() {
        return;
    }
    let paths = handle.watched_paths();
    if paths.is_empty() {
        debug!("lexicon hot reload requested but no word-list files configured");
        return;
    }

    thread::spawn(move || {
        let poll = Duration::from_secs(2);
        let mut last: Vec<Option<SystemTime>> = paths.iter().map(|p| mtime(p)).collect();

        loop {
            thread::sleep(poll);
            let now: Vec<Option<SystemTime>> = paths.iter().map(|p| mtime(p)).collect();
            if now != last {
                handle.reload();
                last = now;
            }
        }
    });
}

fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
