//! Cross-validated grid search over pipeline hyperparameters.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::error::{Result, XystonError};
use crate::ml::logistic::{LogisticRegression, LogisticRegressionConfig};
use crate::ml::pipeline::TextClassifierPipeline;
use crate::ml::split::KFold;
use crate::ml::vectorizer::{CountVectorizer, VectorizerConfig};

/// One hyperparameter combination of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Vocabulary cap for the vectorizer stage.
    pub max_features: usize,
    /// Inverse regularization strength for the classifier stage.
    pub regularization: f64,
}

/// The hyperparameter grid: every combination of vocabulary size and
/// regularization strength is evaluated.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    /// Candidate vocabulary caps.
    pub max_features: Vec<usize>,
    /// Candidate inverse regularization strengths.
    pub regularization: Vec<f64>,
}

impl ParamGrid {
    /// Enumerate the cartesian product of the grid, in deterministic order.
    pub fn points(&self) -> Vec<GridPoint> {
        let mut points = Vec::with_capacity(self.max_features.len() * self.regularization.len());
        for &max_features in &self.max_features {
            for &regularization in &self.regularization {
                points.push(GridPoint {
                    max_features,
                    regularization,
                });
            }
        }
        points
    }

    /// Check whether the grid enumerates no combinations.
    pub fn is_empty(&self) -> bool {
        self.max_features.is_empty() || self.regularization.is_empty()
    }
}

/// Exhaustive cross-validated search over a [`ParamGrid`].
///
/// For every grid point, a fresh vectorizer+classifier pipeline is scored
/// by mean k-fold validation accuracy (the vectorizer is refitted on each
/// fold's training documents, so no test vocabulary leaks in). The best
/// combination is then refitted on the full training set.
///
/// Grid points are evaluated in parallel; combinations are independent.
///
/// # Examples
///
/// ```no_run
/// use xyston::ml::grid_search::{GridSearch, ParamGrid};
///
/// # fn run(docs: Vec<String>, targets: Vec<usize>, test_docs: Vec<String>, test_targets: Vec<usize>) -> xyston::error::Result<()> {
/// let grid = ParamGrid {
///     max_features: vec![1500, 3000, 5000],
///     regularization: vec![1e-3, 1e-2, 5e-2, 1e-1, 5e-1],
/// };
///
/// let mut search = GridSearch::new(grid)?;
/// search.fit(&docs, &targets)?;
///
/// println!("Best hyperparameters {:?}", search.best_params()?);
/// println!("Best train score {}", search.best_score()?);
/// println!(
///     "Test score of best estimator {}",
///     search.score(&test_docs, &test_targets)?
/// );
/// # Ok(())
/// # }
/// ```
pub struct GridSearch {
    grid: ParamGrid,
    n_folds: usize,
    seed: u64,
    analyzer: Arc<dyn Analyzer>,
    base_config: LogisticRegressionConfig,
    results: Vec<(GridPoint, f64)>,
    best_point: Option<GridPoint>,
    best_score: f64,
    best_pipeline: Option<TextClassifierPipeline>,
}

impl GridSearch {
    /// Create a grid search with the standard analyzer and 5-fold
    /// cross-validation.
    pub fn new(grid: ParamGrid) -> Result<Self> {
        Ok(Self {
            grid,
            n_folds: 5,
            seed: 42,
            analyzer: Arc::new(StandardAnalyzer::new()?),
            base_config: LogisticRegressionConfig::default(),
            results: Vec::new(),
            best_point: None,
            best_score: 0.0,
            best_pipeline: None,
        })
    }

    /// Use a custom analyzer for the vectorizer stage.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Set the number of cross-validation folds.
    pub fn with_folds(mut self, n_folds: usize) -> Self {
        self.n_folds = n_folds;
        self
    }

    /// Set the fold-shuffling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the classifier hyperparameters shared by every candidate
    /// (its `regularization_c` is overridden per grid point).
    pub fn with_base_config(mut self, config: LogisticRegressionConfig) -> Self {
        self.base_config = config;
        self
    }

    /// Evaluate every grid point and refit the best pipeline.
    pub fn fit<S: AsRef<str> + Sync>(&mut self, documents: &[S], targets: &[usize]) -> Result<()> {
        if self.grid.is_empty() {
            return Err(XystonError::model("Parameter grid is empty"));
        }
        if documents.len() != targets.len() {
            return Err(XystonError::model(format!(
                "Document/target count mismatch: {} documents, {} targets",
                documents.len(),
                targets.len()
            )));
        }

        let folds = KFold::new(self.n_folds)
            .with_seed(self.seed)
            .split(documents.len())?;
        let points = self.grid.points();

        let scores: Result<Vec<f64>> = points
            .par_iter()
            .map(|point| self.evaluate_point(point, documents, targets, &folds))
            .collect();
        let scores = scores?;

        self.results = points.iter().copied().zip(scores.iter().copied()).collect();

        let (best_index, best_score) = scores
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, bs), (i, &s)| {
                if s > bs { (i, s) } else { (bi, bs) }
            });
        let best_point = points[best_index];

        let mut best_pipeline = self.build_pipeline(&best_point);
        best_pipeline.fit(documents, targets)?;

        self.best_point = Some(best_point);
        self.best_score = best_score;
        self.best_pipeline = Some(best_pipeline);
        Ok(())
    }

    /// The best hyperparameter combination.
    pub fn best_params(&self) -> Result<&GridPoint> {
        self.best_point
            .as_ref()
            .ok_or_else(|| XystonError::model("Grid search has not been fitted"))
    }

    /// Mean cross-validation accuracy of the best combination.
    pub fn best_score(&self) -> Result<f64> {
        if self.best_point.is_none() {
            return Err(XystonError::model("Grid search has not been fitted"));
        }
        Ok(self.best_score)
    }

    /// Mean cross-validation accuracy of every grid point, in grid order.
    pub fn results(&self) -> &[(GridPoint, f64)] {
        &self.results
    }

    /// The refitted best pipeline.
    pub fn best_pipeline(&self) -> Result<&TextClassifierPipeline> {
        self.best_pipeline
            .as_ref()
            .ok_or_else(|| XystonError::model("Grid search has not been fitted"))
    }

    /// Predict with the refitted best pipeline.
    pub fn predict<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<Vec<usize>> {
        self.best_pipeline()?.predict(documents)
    }

    /// Mean accuracy of the refitted best pipeline on the given data.
    pub fn score<S: AsRef<str> + Sync>(&self, documents: &[S], targets: &[usize]) -> Result<f64> {
        self.best_pipeline()?.score(documents, targets)
    }

    fn build_pipeline(&self, point: &GridPoint) -> TextClassifierPipeline {
        let vectorizer_config = VectorizerConfig {
            max_features: Some(point.max_features),
            ..VectorizerConfig::default()
        };
        let classifier_config = LogisticRegressionConfig {
            regularization_c: point.regularization,
            ..self.base_config.clone()
        };

        TextClassifierPipeline::new(
            CountVectorizer::with_config(vectorizer_config, Arc::clone(&self.analyzer)),
            LogisticRegression::with_config(classifier_config),
        )
    }

    fn evaluate_point<S: AsRef<str> + Sync>(
        &self,
        point: &GridPoint,
        documents: &[S],
        targets: &[usize],
        folds: &[(Vec<usize>, Vec<usize>)],
    ) -> Result<f64> {
        let mut fold_scores = Vec::with_capacity(folds.len());

        for (train_idx, test_idx) in folds {
            let train_docs: Vec<&str> = train_idx.iter().map(|&i| documents[i].as_ref()).collect();
            let train_targets: Vec<usize> = train_idx.iter().map(|&i| targets[i]).collect();
            let test_docs: Vec<&str> = test_idx.iter().map(|&i| documents[i].as_ref()).collect();
            let test_targets: Vec<usize> = test_idx.iter().map(|&i| targets[i]).collect();

            let mut pipeline = self.build_pipeline(point);
            pipeline.fit(&train_docs, &train_targets)?;
            fold_scores.push(pipeline.score(&test_docs, &test_targets)?);
        }

        Ok(fold_scores.iter().sum::<f64>() / fold_scores.len() as f64)
    }
}

impl std::fmt::Debug for GridSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSearch")
            .field("grid", &self.grid)
            .field("n_folds", &self.n_folds)
            .field("best_point", &self.best_point)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_corpus() -> (Vec<String>, Vec<usize>) {
        let space = [
            "rocket launch into orbit",
            "orbit around the moon",
            "spacecraft in orbit launch",
            "rocket engine orbit test",
            "moon landing rocket mission",
            "satellite orbit launch window",
        ];
        let autos = [
            "car engine repair manual",
            "car oil change schedule",
            "brake repair for the car",
            "engine oil for old car",
            "car brake pads replacement",
            "repair manual for car engine",
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
    fn test_points_enumeration() {
        let grid = ParamGrid {
            max_features: vec![10, 20],
            regularization: vec![0.1, 1.0, 10.0],
        };
        let points = grid.points();

        assert_eq!(points.len(), 6);
        assert_eq!(points[0].max_features, 10);
        assert_eq!(points[0].regularization, 0.1);
        assert_eq!(points[5].max_features, 20);
        assert_eq!(points[5].regularization, 10.0);
    }

    #[test]
    fn test_grid_search_fit() {
        let (docs, targets) = sample_corpus();
        let grid = ParamGrid {
            max_features: vec![16, 24],
            regularization: vec![0.1, 1.0],
        };

        let mut search = GridSearch::new(grid).unwrap().with_folds(3);
        search.fit(&docs, &targets).unwrap();

        let best = search.best_params().unwrap();
        assert!([16, 24].contains(&best.max_features));
        assert!([0.1, 1.0].contains(&best.regularization));
        assert_eq!(search.results().len(), 4);

        // The refitted pipeline separates the training corpus
        assert_eq!(search.score(&docs, &targets).unwrap(), 1.0);
    }

    #[test]
    fn test_deterministic_results() {
        let (docs, targets) = sample_corpus();
        let grid = ParamGrid {
            max_features: vec![8],
            regularization: vec![0.5, 1.0],
        };

        let mut first = GridSearch::new(grid.clone()).unwrap().with_folds(3);
        first.fit(&docs, &targets).unwrap();
        let mut second = GridSearch::new(grid).unwrap().with_folds(3);
        second.fit(&docs, &targets).unwrap();

        assert_eq!(first.results(), second.results());
        assert_eq!(
            first.best_params().unwrap(),
            second.best_params().unwrap()
        );
    }

    #[test]
    fn test_accessors_before_fit_fail() {
        let grid = ParamGrid {
            max_features: vec![8],
            regularization: vec![1.0],
        };
        let search = GridSearch::new(grid).unwrap();

        assert!(search.best_params().is_err());
        assert!(search.best_score().is_err());
        assert!(search.predict(&["doc".to_string()]).is_err());
    }

    #[test]
    fn test_empty_grid_fails() {
        let grid = ParamGrid {
            max_features: vec![],
            regularization: vec![1.0],
        };
        let mut search = GridSearch::new(grid).unwrap();
        let (docs, targets) = sample_corpus();
        assert!(search.fit(&docs, &targets).is_err());
    }
}
