// tests/lexicon_refresh.rs
//
// Lexicon swaps through the shared handle: visibility, snapshot isolation and
// concurrent readers never seeing a partial lexicon.

use std::fs;
use std::sync::Arc;
use std::thread;

use verba_sentiment::config::WordLists;
use verba_sentiment::{
    Lexicon, LexiconHandle, LexiconProvider, SentimentConfig, SentimentEngine,
};

fn engine_on(handle: &LexiconHandle) -> SentimentEngine {
    SentimentEngine::new(&SentimentConfig::default(), Arc::new(handle.clone())).unwrap()
}

#[test]
fn replacement_is_visible_to_subsequent_calls() {
    let handle = LexiconHandle::new(Lexicon::new(["good"], ["bad"], false));
    let engine = engine_on(&handle);
    assert!(engine.calculate_sentiment_score("stellar") == 0.0);

    handle.replace(Lexicon::new(["stellar"], ["bad"], false));
    assert!(engine.calculate_sentiment_score("stellar") > 0.0);
    assert_eq!(engine.calculate_sentiment_score("good"), 0.0);
}

#[test]
fn reload_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let pos = dir.path().join("positive.txt");
    let neg = dir.path().join("negative.txt");
    fs::write(&pos, "# pos\ngood\n").unwrap();
    fs::write(&neg, "bad\n").unwrap();

    let handle = LexiconHandle::from_sources(
        WordLists {
            positive_path: Some(pos.clone()),
            negative_path: Some(neg.clone()),
            positive: Vec::new(),
            negative: Vec::new(),
        },
        false,
    );
    let engine = engine_on(&handle);
    assert!(engine.calculate_sentiment_score("meh") == 0.0);

    fs::write(&neg, "bad\nmeh\n").unwrap();
    assert_eq!(handle.reload(), (1, 2));
    assert!(engine.calculate_sentiment_score("meh") < 0.0);
}

#[test]
fn concurrent_readers_see_old_or_new_lexicon() {
    let old = Lexicon::new(["good"], Vec::<String>::new(), false);
    let new = Lexicon::new(Vec::<String>::new(), ["good"], false);
    let handle = LexiconHandle::new(old);
    let engine = Arc::new(engine_on(&handle));

    let positive = 1.0 / 4.0;
    let negative = -1.0 / 4.0;

    thread::scope(|s| {
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            s.spawn(move || {
                for _ in 0..2_000 {
                    let v = engine.calculate_sentiment_score("good");
                    assert!(v == positive || v == negative, "partial lexicon seen: {v}");
                }
            });
        }
        s.spawn(|| {
            for i in 0..200 {
                if i % 2 == 0 {
                    handle.replace(new.clone());
                } else {
                    handle.replace(Lexicon::new(["good"], Vec::<String>::new(), false));
                }
            }
        });
    });

    // snapshots taken before a swap stay intact
    let snap = handle.snapshot();
    handle.replace(Lexicon::default());
    assert_eq!(snap.positive_words().len() + snap.negative_words().len(), 1);
}
