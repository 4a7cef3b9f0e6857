//! Cross-validated regularization strength selection.

use crate::embedding::matrix::DenseMatrix;
use crate::error::{Result, XystonError};
use crate::ml::logistic::{LogisticRegression, LogisticRegressionConfig};
use crate::ml::split::KFold;

/// Logistic regression with built-in cross-validated selection of the
/// inverse regularization strength `C`.
///
/// Each candidate `C` is scored by mean k-fold validation accuracy; the
/// best candidate (first wins ties, so with the default ascending grid the
/// smaller, more regularized value is preferred) is then refitted on the
/// full training set.
///
/// # Examples
///
/// ```no_run
/// use xyston::embedding::matrix::DenseMatrix;
/// use xyston::ml::cv::LogisticRegressionCV;
///
/// # fn run(x: DenseMatrix, y: Vec<usize>) -> xyston::error::Result<()> {
/// let mut cv = LogisticRegressionCV::new();
/// cv.fit(&x, &y)?;
/// println!("Optimal C value {}", cv.best_c()?);
/// println!("train accuracy {}", cv.score(&x, &y)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LogisticRegressionCV {
    cs: Vec<f64>,
    n_folds: usize,
    seed: u64,
    base_config: LogisticRegressionConfig,
    best_c: Option<f64>,
    best_score: f64,
    cv_scores: Vec<(f64, f64)>,
    model: Option<LogisticRegression>,
}

impl LogisticRegressionCV {
    /// Create a selector over the default grid of ten log-spaced candidates
    /// between `1e-4` and `1e4`, scored with 5-fold cross-validation.
    pub fn new() -> Self {
        Self {
            cs: Self::default_cs(),
            n_folds: 5,
            seed: 42,
            base_config: LogisticRegressionConfig::default(),
            best_c: None,
            best_score: 0.0,
            cv_scores: Vec::new(),
            model: None,
        }
    }

    /// Ten log-spaced candidates between `1e-4` and `1e4`.
    pub fn default_cs() -> Vec<f64> {
        (0..10)
            .map(|i| 10f64.powf(-4.0 + 8.0 * i as f64 / 9.0))
            .collect()
    }

    /// Use a custom candidate grid.
    pub fn with_cs(mut self, cs: Vec<f64>) -> Self {
        self.cs = cs;
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

    /// Set the base hyperparameters shared by every candidate fit.
    pub fn with_base_config(mut self, config: LogisticRegressionConfig) -> Self {
        self.base_config = config;
        self
    }

    /// Select the best `C` by cross-validation, then refit on all data.
    pub fn fit(&mut self, x: &DenseMatrix, y: &[usize]) -> Result<()> {
        if self.cs.is_empty() {
            return Err(XystonError::model("Candidate C grid is empty"));
        }

        let folds = KFold::new(self.n_folds)
            .with_seed(self.seed)
            .split(x.rows())?;

        self.cv_scores.clear();
        let mut best_c = None;
        let mut best_score = f64::NEG_INFINITY;

        for &c in &self.cs {
            let mut fold_scores = Vec::with_capacity(folds.len());
            for (train_idx, test_idx) in &folds {
                let x_train = x.select_rows(train_idx)?;
                let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
                let x_test = x.select_rows(test_idx)?;
                let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

                let mut candidate = LogisticRegression::with_config(LogisticRegressionConfig {
                    regularization_c: c,
                    ..self.base_config.clone()
                });
                candidate.fit(&x_train, &y_train)?;
                fold_scores.push(candidate.score(&x_test, &y_test)?);
            }

            let mean_score = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
            self.cv_scores.push((c, mean_score));

            if mean_score > best_score {
                best_score = mean_score;
                best_c = Some(c);
            }
        }

        let best_c = best_c.ok_or_else(|| XystonError::internal("No candidate was scored"))?;

        let mut model = LogisticRegression::with_config(LogisticRegressionConfig {
            regularization_c: best_c,
            ..self.base_config.clone()
        });
        model.fit(x, y)?;

        self.best_c = Some(best_c);
        self.best_score = best_score;
        self.model = Some(model);
        Ok(())
    }

    /// The selected inverse regularization strength.
    pub fn best_c(&self) -> Result<f64> {
        self.best_c
            .ok_or_else(|| XystonError::model("Selector has not been fitted"))
    }

    /// Mean cross-validation accuracy of the selected candidate.
    pub fn best_score(&self) -> Result<f64> {
        if self.best_c.is_none() {
            return Err(XystonError::model("Selector has not been fitted"));
        }
        Ok(self.best_score)
    }

    /// Mean cross-validation accuracy for every candidate, in grid order.
    pub fn cv_scores(&self) -> &[(f64, f64)] {
        &self.cv_scores
    }

    /// The refitted model, if fitting has completed.
    pub fn model(&self) -> Result<&LogisticRegression> {
        self.model
            .as_ref()
            .ok_or_else(|| XystonError::model("Selector has not been fitted"))
    }

    /// Predict with the refitted model.
    pub fn predict(&self, x: &DenseMatrix) -> Result<Vec<usize>> {
        self.model()?.predict(x)
    }

    /// Mean accuracy of the refitted model on the given data.
    pub fn score(&self, x: &DenseMatrix, y: &[usize]) -> Result<f64> {
        self.model()?.score(x, y)
    }
}

impl Default for LogisticRegressionCV {
    fn default() -> Self {
        Self::new()
    }
}
