use std::sync::Arc;

use xyston::analysis::analyzer::StandardAnalyzer;
use xyston::embedding::aggregator::EmbeddingAggregator;
use xyston::embedding::matrix::DenseMatrix;
use xyston::embedding::sentiment::{LinearSentimentModel, SentimentModelConfig, SentimentScorer};
use xyston::embedding::vector::Vector;
use xyston::embedding::word_vectors::{InMemoryWordVectors, WordVectors};
use xyston::error::Result;
use xyston::ml::cv::LogisticRegressionCV;
use xyston::ml::logistic::LogisticRegression;
use xyston::ml::metrics::ConfusionMatrix;
use xyston::ml::split::train_test_split;

/// Pretrained-style word vectors with two well-separated topic directions.
fn topic_word_vectors() -> Result<InMemoryWordVectors> {
    InMemoryWordVectors::from_entries(vec![
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
    ])
}

/// A small 20-newsgroups style corpus over two topics.
fn topic_corpus() -> (Vec<String>, Vec<usize>) {
    let space = [
        "rocket launch to orbit",
        "satellite in orbit around the moon",
        "moon rocket launch",
        "orbit of the satellite",
        "rocket to the moon",
        "launch the satellite into orbit",
        "moon orbit mission",
        "satellite rocket launch",
        "orbit launch window",
        "rocket orbit satellite",
    ];
    let autos = [
        "car engine and brake",
        "oil change for the car",
        "engine oil and wheel",
        "brake and wheel repair",
        "car wheel alignment",
        "engine brake check",
        "oil for the car engine",
        "wheel and brake service",
        "car engine oil",
        "brake oil for the wheel",
    ];

    let mut docs = Vec::new();
    let mut targets = Vec::new();
    for doc in space {
        docs.push(doc.to_string());
        targets.push(0);
    }
    for doc in autos {
        docs.push(doc.to_string());
        targets.push(1);
    }
    (docs, targets)
}

fn encode_corpus() -> Result<(DenseMatrix, Vec<usize>)> {
    let aggregator = EmbeddingAggregator::new(
        Arc::new(StandardAnalyzer::new()?),
        Arc::new(topic_word_vectors()?),
    );
    let (docs, targets) = topic_corpus();
    let features = aggregator.encode_batch(&docs)?;
    Ok((features, targets))
}

#[test]
fn classifier_on_averaged_embeddings_separates_topics() -> Result<()> {
    let (features, targets) = encode_corpus()?;
    let (train_idx, test_idx) = train_test_split(features.rows(), 0.25, 7)?;

    let x_train = features.select_rows(&train_idx)?;
    let y_train: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();
    let x_test = features.select_rows(&test_idx)?;
    let y_test: Vec<usize> = test_idx.iter().map(|&i| targets[i]).collect();

    let mut classifier = LogisticRegression::new();
    classifier.fit(&x_train, &y_train)?;

    let train_accuracy = classifier.score(&x_train, &y_train)?;
    let test_accuracy = classifier.score(&x_test, &y_test)?;
    assert_eq!(train_accuracy, 1.0);
    assert_eq!(test_accuracy, 1.0);
    Ok(())
}

#[test]
fn cross_validated_selection_picks_a_candidate_and_refits() -> Result<()> {
    let (features, targets) = encode_corpus()?;

    let mut cv = LogisticRegressionCV::new()
        .with_cs(vec![0.01, 1.0, 100.0])
        .with_folds(5);
    cv.fit(&features, &targets)?;

    assert!([0.01, 1.0, 100.0].contains(&cv.best_c()?));
    assert!(cv.best_score()? > 0.8);
    assert_eq!(cv.score(&features, &targets)?, 1.0);
    Ok(())
}

#[test]
fn confusion_matrix_summarizes_predictions_with_labels() -> Result<()> {
    let (features, targets) = encode_corpus()?;

    let mut classifier = LogisticRegression::new();
    classifier.fit(&features, &targets)?;
    let predictions = classifier.predict(&features)?;

    let labels = vec!["sci.space".to_string(), "rec.autos".to_string()];
    let matrix = ConfusionMatrix::from_predictions(&targets, &predictions, labels)?;

    assert_eq!(matrix.total(), targets.len());
    assert_eq!(matrix.accuracy(), classifier.score(&features, &targets)?);
    assert_eq!(matrix.count(0, 0) + matrix.count(0, 1), 10);
    assert_eq!(matrix.count(1, 0) + matrix.count(1, 1), 10);

    let rendered = matrix.to_string();
    assert!(rendered.contains("true classes"));
    assert!(rendered.contains("predicted classes"));
    assert!(rendered.contains("sci.space"));
    assert!(rendered.contains("rec.autos"));
    Ok(())
}

#[test]
fn model_survives_a_save_load_roundtrip() -> Result<()> {
    let (features, targets) = encode_corpus()?;

    let mut classifier = LogisticRegression::new();
    classifier.fit(&features, &targets)?;
    let expected = classifier.predict(&features)?;

    let file = tempfile::NamedTempFile::new().unwrap();
    classifier.save(file.path())?;
    let loaded = LogisticRegression::load(file.path())?;

    assert_eq!(loaded.predict(&features)?, expected);
    Ok(())
}

#[test]
fn sentiment_scoring_averages_per_token_scores() -> Result<()> {
    let table = InMemoryWordVectors::from_entries(vec![
        ("good".to_string(), vec![1.0, 0.0]),
        ("great".to_string(), vec![0.9, 0.1]),
        ("excellent".to_string(), vec![1.0, 0.1]),
        ("bad".to_string(), vec![0.0, 1.0]),
        ("terrible".to_string(), vec![0.1, 0.9]),
        ("awful".to_string(), vec![0.0, 0.9]),
    ])?;

    // Train the embedding-to-sentiment regressor on the lexicon itself
    let lexicon = ["good", "great", "excellent", "bad", "terrible", "awful"];
    let rows: Vec<Vector> = lexicon
        .iter()
        .map(|word| Vector::new(table.vector_for(word).unwrap().to_vec()))
        .collect();
    let x = DenseMatrix::from_rows(rows)?;
    let y = vec![1.0, 1.0, 1.0, -1.0, -1.0, -1.0];

    let mut model = LinearSentimentModel::new(SentimentModelConfig::default());
    model.train(&x, &y)?;

    let scorer = SentimentScorer::new(
        Arc::new(StandardAnalyzer::new()?),
        Arc::new(table),
        model,
    )?;

    assert!(scorer.score("good great excellent")? > 0.4);
    assert!(scorer.score("bad terrible awful")? < -0.4);

    // Mixed sentence lands between the extremes
    let mixed = scorer.score("good bad")?;
    assert!(mixed.abs() < 0.4, "mixed score {mixed}");

    // No known tokens: neutral fallback
    assert_eq!(scorer.score("nothing in the lexicon")?, 0.0);
    Ok(())
}
