//! Embedding Classification Example
//!
//! This example encodes a small two-topic corpus by averaging word vectors,
//! trains a multinomial logistic regression classifier on the embeddings,
//! and prints train/test accuracy together with a labelled confusion matrix.

use std::sync::Arc;

use anyhow::Result;

use xyston::analysis::analyzer::StandardAnalyzer;
use xyston::embedding::aggregator::EmbeddingAggregator;
use xyston::embedding::word_vectors::InMemoryWordVectors;
use xyston::ml::cv::LogisticRegressionCV;
use xyston::ml::logistic::LogisticRegression;
use xyston::ml::metrics::ConfusionMatrix;
use xyston::ml::split::train_test_split;

fn main() -> Result<()> {
    println!("=== Embedding Classification Example ===\n");

    // Toy pretrained vectors: two topic directions
    let word_vectors = InMemoryWordVectors::from_entries(vec![
        ("rocket".to_string(), vec![1.0, 0.0, 0.1]),
        ("orbit".to_string(), vec![0.9, 0.1, 0.0]),
        ("moon".to_string(), vec![0.8, 0.0, 0.2]),
        ("satellite".to_string(), vec![1.0, 0.1, 0.1]),
        ("launch".to_string(), vec![0.9, 0.0, 0.1]),
        ("car".to_string(), vec![0.0, 1.0, 0.1]),
        ("engine".to_string(), vec![0.1, 0.9, 0.0]),
        ("brake".to_string(), vec![0.0, 0.8, 0.2]),
        ("oil".to_string(), vec![0.1, 1.0, 0.1]),
        ("wheel".to_string(), vec![0.0, 0.9, 0.1]),
    ])?;

    let aggregator = EmbeddingAggregator::new(
        Arc::new(StandardAnalyzer::new()?),
        Arc::new(word_vectors),
    );

    let documents = vec![
        "rocket launch to orbit",
        "satellite in orbit around the moon",
        "moon rocket launch",
        "orbit of the satellite",
        "rocket to the moon",
        "launch the satellite into orbit",
        "moon orbit mission",
        "satellite rocket launch",
        "car engine and brake",
        "oil change for the car",
        "engine oil and wheel",
        "brake and wheel repair",
        "car wheel alignment",
        "engine brake check",
        "oil for the car engine",
        "wheel and brake service",
    ];
    let targets: Vec<usize> = (0..documents.len())
        .map(|i| usize::from(i >= documents.len() / 2))
        .collect();
    let labels = vec!["sci.space".to_string(), "rec.autos".to_string()];

    println!("Encoding {} documents...", documents.len());
    let features = aggregator.encode_batch(&documents)?;
    println!(
        "Dataset matrix: {} x {}\n",
        features.rows(),
        features.cols()
    );

    let (train_idx, test_idx) = train_test_split(features.rows(), 0.25, 42)?;
    let x_train = features.select_rows(&train_idx)?;
    let y_train: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();
    let x_test = features.select_rows(&test_idx)?;
    let y_test: Vec<usize> = test_idx.iter().map(|&i| targets[i]).collect();

    let mut classifier = LogisticRegression::new();
    classifier.fit(&x_train, &y_train)?;
    println!(
        "train accuracy {} test accuracy {}",
        classifier.score(&x_train, &y_train)?,
        classifier.score(&x_test, &y_test)?
    );

    let mut cv = LogisticRegressionCV::new().with_folds(4);
    cv.fit(&x_train, &y_train)?;
    println!("Optimal C value {}", cv.best_c()?);

    let predictions = classifier.predict(&features)?;
    let matrix = ConfusionMatrix::from_predictions(&targets, &predictions, labels)?;
    println!("\n{matrix}");

    Ok(())
}
