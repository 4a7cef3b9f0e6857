//! Sentiment Scoring Example
//!
//! This example trains a linear sentiment regressor on a small labeled
//! lexicon of word embeddings, then scores sentences by averaging the
//! per-token sentiment values.

use std::sync::Arc;

use anyhow::Result;

use xyston::analysis::analyzer::StandardAnalyzer;
use xyston::embedding::matrix::DenseMatrix;
use xyston::embedding::sentiment::{LinearSentimentModel, SentimentModelConfig, SentimentScorer};
use xyston::embedding::vector::Vector;
use xyston::embedding::word_vectors::{InMemoryWordVectors, WordVectors};

fn main() -> Result<()> {
    println!("=== Sentiment Scoring Example ===\n");

    let word_vectors = InMemoryWordVectors::from_entries(vec![
        ("good".to_string(), vec![1.0, 0.0]),
        ("great".to_string(), vec![0.9, 0.1]),
        ("excellent".to_string(), vec![1.0, 0.1]),
        ("fine".to_string(), vec![0.7, 0.3]),
        ("bad".to_string(), vec![0.0, 1.0]),
        ("terrible".to_string(), vec![0.1, 0.9]),
        ("awful".to_string(), vec![0.0, 0.9]),
        ("poor".to_string(), vec![0.3, 0.7]),
    ])?;

    // Labeled lexicon: +1 for positive words, -1 for negative words
    let lexicon = [
        ("good", 1.0f32),
        ("great", 1.0),
        ("excellent", 1.0),
        ("fine", 0.5),
        ("bad", -1.0),
        ("terrible", -1.0),
        ("awful", -1.0),
        ("poor", -0.5),
    ];

    let rows: Vec<Vector> = lexicon
        .iter()
        .map(|(word, _)| Vector::new(word_vectors.vector_for(word).unwrap().to_vec()))
        .collect();
    let x = DenseMatrix::from_rows(rows)?;
    let y: Vec<f32> = lexicon.iter().map(|(_, label)| *label).collect();

    println!("Training sentiment regressor on {} lexicon entries...", y.len());
    let mut model = LinearSentimentModel::new(SentimentModelConfig::default());
    model.train(&x, &y)?;

    let scorer = SentimentScorer::new(
        Arc::new(StandardAnalyzer::new()?),
        Arc::new(word_vectors),
        model,
    )?;

    let sentences = [
        "The food was good and the service excellent",
        "A terrible movie with awful acting",
        "It was fine, not great but not bad either",
        "Nothing from the lexicon appears here",
    ];

    println!();
    for sentence in sentences {
        let score = scorer.score(sentence)?;
        println!("{score:>6.3}  {sentence}");
        for (token, token_score) in scorer.token_scores(sentence)? {
            println!("        {token}: {token_score:.3}");
        }
    }

    Ok(())
}
