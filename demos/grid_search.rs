//! Grid Search Example
//!
//! This example tunes a count-vectorizer + logistic-regression pipeline
//! over a grid of vocabulary sizes and regularization strengths, then
//! scores the best estimator on held-out documents.

use anyhow::Result;

use xyston::ml::grid_search::{GridSearch, ParamGrid};
use xyston::ml::split::train_test_split;

fn main() -> Result<()> {
    println!("=== Grid Search Example ===\n");

    let documents = vec![
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
    let targets: Vec<usize> = (0..documents.len())
        .map(|i| usize::from(i >= documents.len() / 2))
        .collect();

    let (train_idx, test_idx) = train_test_split(documents.len(), 0.2, 42)?;
    let train_docs: Vec<String> = train_idx.iter().map(|&i| documents[i].to_string()).collect();
    let train_targets: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();
    let test_docs: Vec<String> = test_idx.iter().map(|&i| documents[i].to_string()).collect();
    let test_targets: Vec<usize> = test_idx.iter().map(|&i| targets[i]).collect();

    let grid = ParamGrid {
        max_features: vec![15, 30, 50],
        regularization: vec![1e-3, 1e-2, 5e-2, 1e-1, 5e-1],
    };
    println!(
        "Evaluating {} combinations with 4-fold cross-validation...\n",
        grid.points().len()
    );

    let mut search = GridSearch::new(grid)?.with_folds(4);
    search.fit(&train_docs, &train_targets)?;

    for (point, score) in search.results() {
        println!(
            "max_features={:<3} C={:<6} mean CV accuracy {:.3}",
            point.max_features, point.regularization, score
        );
    }

    println!("\nBest hyperparameters {:?}", search.best_params()?);
    println!("Best train score {}", search.best_score()?);
    println!(
        "Test score of best estimator {}",
        search.score(&test_docs, &test_targets)?
    );

    Ok(())
}
