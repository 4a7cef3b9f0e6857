use xyston::error::Result;
use xyston::ml::grid_search::{GridSearch, ParamGrid};
use xyston::ml::pipeline::TextClassifierPipeline;
use xyston::ml::split::train_test_split;

/// A two-topic corpus large enough for fold-based evaluation.
fn build_corpus() -> (Vec<String>, Vec<usize>) {
    let space = [
        "rocket launch into orbit",
        "satellite orbit around the moon",
        "moon landing rocket mission",
        "orbit transfer for the satellite",
        "rocket engine test before launch",
        "satellite launch window in orbit",
        "moon rocket on the launch pad",
        "orbit insertion of the satellite",
        "rocket stage separation after launch",
        "satellite tracking in lunar orbit",
    ];
    let autos = [
        "car engine repair manual",
        "oil change for the car",
        "brake pads for the wheel",
        "engine oil and filter",
        "car wheel alignment service",
        "brake fluid for the car",
        "engine overheating in the car",
        "wheel bearing and brake check",
        "car oil leak repair",
        "brake and wheel inspection",
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

#[test]
fn grid_search_selects_refits_and_scores() -> Result<()> {
    let (docs, targets) = build_corpus();
    let (train_idx, test_idx) = train_test_split(docs.len(), 0.2, 3)?;

    let train_docs: Vec<String> = train_idx.iter().map(|&i| docs[i].clone()).collect();
    let train_targets: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();
    let test_docs: Vec<String> = test_idx.iter().map(|&i| docs[i].clone()).collect();
    let test_targets: Vec<usize> = test_idx.iter().map(|&i| targets[i]).collect();

    let grid = ParamGrid {
        max_features: vec![20, 40],
        regularization: vec![0.1, 0.5, 1.0],
    };

    let mut search = GridSearch::new(grid)?.with_folds(4);
    search.fit(&train_docs, &train_targets)?;

    // Every combination was evaluated
    assert_eq!(search.results().len(), 6);
    for (_, score) in search.results() {
        assert!((0.0..=1.0).contains(score));
    }

    let best = search.best_params()?;
    assert!([20, 40].contains(&best.max_features));
    assert!([0.1, 0.5, 1.0].contains(&best.regularization));
    assert_eq!(
        search.best_score()?,
        search
            .results()
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max)
    );

    // The refitted best estimator generalizes to held-out documents
    assert!(search.score(&test_docs, &test_targets)? >= 0.75);
    assert_eq!(search.score(&train_docs, &train_targets)?, 1.0);
    Ok(())
}

#[test]
fn grid_search_is_deterministic_across_runs() -> Result<()> {
    let (docs, targets) = build_corpus();
    let grid = ParamGrid {
        max_features: vec![30],
        regularization: vec![0.5, 1.0],
    };

    let mut first = GridSearch::new(grid.clone())?.with_folds(4);
    first.fit(&docs, &targets)?;
    let mut second = GridSearch::new(grid)?.with_folds(4);
    second.fit(&docs, &targets)?;

    assert_eq!(first.results(), second.results());
    assert_eq!(first.best_params()?, second.best_params()?);
    assert_eq!(first.predict(&docs)?, second.predict(&docs)?);
    Ok(())
}

#[test]
fn standalone_pipeline_matches_the_original_flow() -> Result<()> {
    use std::sync::Arc;

    use xyston::analysis::analyzer::StandardAnalyzer;
    use xyston::ml::logistic::{LogisticRegression, LogisticRegressionConfig};
    use xyston::ml::vectorizer::{CountVectorizer, VectorizerConfig};

    let (docs, targets) = build_corpus();

    let vectorizer = CountVectorizer::with_config(
        VectorizerConfig {
            max_features: Some(40),
            ..VectorizerConfig::default()
        },
        Arc::new(StandardAnalyzer::new()?),
    );
    let classifier = LogisticRegression::with_config(LogisticRegressionConfig::with_c(0.5));

    let mut pipeline = TextClassifierPipeline::new(vectorizer, classifier);
    pipeline.fit(&docs, &targets)?;

    assert_eq!(pipeline.score(&docs, &targets)?, 1.0);
    assert_eq!(
        pipeline.predict(&["rocket orbit".to_string(), "car brake".to_string()])?,
        vec![0, 1]
    );
    Ok(())
}
