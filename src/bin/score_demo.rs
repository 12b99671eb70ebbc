//! Scores each argument (or stdin lines when none are given) and prints one
//! JSON object per text. Uses the same config resolution as the service.

use std::io::BufRead;
use std::sync::Arc;

use serde_json::json;
use verba_sentiment::{LexiconHandle, SentimentAnalyzer, SentimentConfig};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SentimentConfig::load()?;
    let lexicon = LexiconHandle::from_sources(
        config.analysis.word_lists.clone(),
        config.analysis.text_processing.case_sensitive,
    );
    let analyzer = SentimentAnalyzer::from_config(&config, Arc::new(lexicon))?;

    let mut texts: Vec<String> = std::env::args().skip(1).collect();
    if texts.is_empty() {
        texts = std::io::stdin().lock().lines().collect::<Result<_, _>>()?;
    }

    for text in &texts {
        let result = analyzer.analyze(text);
        let level = result.confidence_level(analyzer.confidence_levels());
        println!(
            "{}",
            json!({
                "text": text,
                "label": result.label,
                "score": result.score,
                "confidence": result.confidence,
                "confidence_level": level,
            })
        );
    }
    Ok(())
}
