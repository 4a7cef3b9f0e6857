//! Multinomial logistic regression.

use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::embedding::matrix::DenseMatrix;
use crate::embedding::vector::Vector;
use crate::error::{Result, XystonError};
use crate::ml::metrics::accuracy_score;
use crate::ml::{ModelMetadata, TrainingStats};

/// Hyperparameters for multinomial logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionConfig {
    /// Inverse of the L2 regularization strength. Smaller values specify
    /// stronger regularization.
    pub regularization_c: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Maximum number of gradient descent iterations.
    pub max_iterations: usize,
    /// Stop when the loss improves by less than this amount.
    pub tolerance: f64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            regularization_c: 1.0,
            learning_rate: 0.5,
            max_iterations: 200,
            tolerance: 1e-5,
        }
    }
}

impl LogisticRegressionConfig {
    /// Configuration with a specific inverse regularization strength.
    pub fn with_c(regularization_c: f64) -> Self {
        Self {
            regularization_c,
            ..Self::default()
        }
    }
}

/// Multinomial (softmax) logistic regression classifier.
///
/// Minimizes mean cross-entropy plus an L2 penalty of `‖W‖²/(2·C·n)` on the
/// weights (the bias is unpenalized) by full-batch gradient descent.
/// Weights start at zero, so training is deterministic: fitting twice on
/// the same data produces the same model.
///
/// # Examples
///
/// ```
/// use xyston::embedding::matrix::DenseMatrix;
/// use xyston::embedding::vector::Vector;
/// use xyston::ml::logistic::LogisticRegression;
///
/// let x = DenseMatrix::from_rows(vec![
///     Vector::new(vec![1.0, 0.0]),
///     Vector::new(vec![0.9, 0.1]),
///     Vector::new(vec![0.0, 1.0]),
///     Vector::new(vec![0.1, 0.9]),
/// ]).unwrap();
/// let y = vec![0, 0, 1, 1];
///
/// let mut classifier = LogisticRegression::new();
/// classifier.fit(&x, &y).unwrap();
///
/// assert_eq!(classifier.predict(&x).unwrap(), y);
/// assert_eq!(classifier.score(&x, &y).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticRegressionConfig,
    /// Class weights, `n_classes * n_features` row-major.
    weights: Vec<f64>,
    /// Per-class intercepts.
    biases: Vec<f64>,
    n_features: usize,
    n_classes: usize,
    trained: bool,
    training_stats: Option<TrainingStats>,
    metadata: ModelMetadata,
}

impl LogisticRegression {
    /// Create an untrained classifier with default hyperparameters.
    pub fn new() -> Self {
        Self::with_config(LogisticRegressionConfig::default())
    }

    /// Create an untrained classifier with the given hyperparameters.
    pub fn with_config(config: LogisticRegressionConfig) -> Self {
        let mut metadata = ModelMetadata::new("LogisticRegression");
        metadata
            .hyperparameters
            .insert("regularization_c".to_string(), config.regularization_c);
        metadata
            .hyperparameters
            .insert("learning_rate".to_string(), config.learning_rate);
        metadata
            .hyperparameters
            .insert("max_iterations".to_string(), config.max_iterations as f64);

        Self {
            config,
            weights: Vec::new(),
            biases: Vec::new(),
            n_features: 0,
            n_classes: 0,
            trained: false,
            training_stats: None,
            metadata,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }

    /// Check if the model is trained.
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Number of classes seen during training.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of features seen during training.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Training statistics from the last fit, if any.
    pub fn training_stats(&self) -> Option<&TrainingStats> {
        self.training_stats.as_ref()
    }

    /// Model metadata.
    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// L2 norm of the weight matrix (diagnostic for regularization tests).
    pub fn weight_norm(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Train the classifier on feature rows `x` and class indices `y`.
    ///
    /// Class indices must be dense: `n_classes` is inferred as
    /// `max(y) + 1`, and at least two distinct classes must be present.
    pub fn fit(&mut self, x: &DenseMatrix, y: &[usize]) -> Result<()> {
        if x.rows() == 0 {
            return Err(XystonError::model("Cannot fit on an empty dataset"));
        }
        if x.rows() != y.len() {
            return Err(XystonError::model(format!(
                "Row/label count mismatch: {} rows, {} labels",
                x.rows(),
                y.len()
            )));
        }

        let n_classes = y.iter().max().map(|m| m + 1).unwrap_or(0);
        let distinct = {
            let mut seen = vec![false; n_classes];
            for &label in y {
                seen[label] = true;
            }
            seen.iter().filter(|s| **s).count()
        };
        if distinct < 2 {
            return Err(XystonError::model(
                "Training data must contain at least two classes",
            ));
        }

        let start_time = Instant::now();
        let n = x.rows();
        let dim = x.cols();
        let n_f64 = n as f64;
        let inv_c = 1.0 / self.config.regularization_c;

        let mut weights = vec![0.0f64; n_classes * dim];
        let mut biases = vec![0.0f64; n_classes];
        let mut training_losses = Vec::new();
        let mut previous_loss = f64::INFINITY;
        let mut converged = false;
        let mut iterations = 0;

        for _ in 0..self.config.max_iterations {
            iterations += 1;

            let mut weight_grads = vec![0.0f64; n_classes * dim];
            let mut bias_grads = vec![0.0f64; n_classes];
            let mut loss = 0.0f64;

            for (i, row) in x.iter_rows().enumerate() {
                let probs = Self::softmax_row(&weights, &biases, row, n_classes, dim);
                loss -= probs[y[i]].max(f64::MIN_POSITIVE).ln();

                for (class, &p) in probs.iter().enumerate() {
                    let residual = p - if class == y[i] { 1.0 } else { 0.0 };
                    let grad_row = &mut weight_grads[class * dim..(class + 1) * dim];
                    for (grad, &value) in grad_row.iter_mut().zip(row.iter()) {
                        *grad += residual * value as f64;
                    }
                    bias_grads[class] += residual;
                }
            }

            loss /= n_f64;
            loss += weights.iter().map(|w| w * w).sum::<f64>() * inv_c / (2.0 * n_f64);
            training_losses.push(loss);

            // Implicit (proximal) step for the L2 term keeps the update
            // stable for arbitrarily small C
            let shrink = 1.0 + self.config.learning_rate * inv_c / n_f64;
            for (w, grad) in weights.iter_mut().zip(weight_grads.iter()) {
                *w = (*w - self.config.learning_rate * grad / n_f64) / shrink;
            }
            for (b, grad) in biases.iter_mut().zip(bias_grads.iter()) {
                *b -= self.config.learning_rate * grad / n_f64;
            }

            if (previous_loss - loss).abs() < self.config.tolerance {
                converged = true;
                break;
            }
            previous_loss = loss;
        }

        let training_time = start_time.elapsed();
        let final_training_loss = training_losses.last().copied().unwrap_or(0.0);

        self.weights = weights;
        self.biases = biases;
        self.n_features = dim;
        self.n_classes = n_classes;
        self.trained = true;
        self.training_stats = Some(TrainingStats {
            training_losses,
            iterations,
            training_time_ms: training_time.as_millis() as u64,
            final_training_loss,
            converged,
        });
        self.metadata.trained_at = chrono::Utc::now();
        self.metadata.training_examples = n;

        Ok(())
    }

    /// Predict class probabilities; each output row sums to 1.
    pub fn predict_proba(&self, x: &DenseMatrix) -> Result<DenseMatrix> {
        self.check_ready(x)?;

        let mut rows = Vec::with_capacity(x.rows());
        for row in x.iter_rows() {
            let probs = Self::softmax_row(
                &self.weights,
                &self.biases,
                row,
                self.n_classes,
                self.n_features,
            );
            rows.push(Vector::new(probs.into_iter().map(|p| p as f32).collect()));
        }

        if rows.is_empty() {
            return Ok(DenseMatrix::with_cols(self.n_classes));
        }
        DenseMatrix::from_rows(rows)
    }

    /// Predict the most probable class for each row.
    pub fn predict(&self, x: &DenseMatrix) -> Result<Vec<usize>> {
        let probs = self.predict_proba(x)?;
        let predictions = probs
            .iter_rows()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(class, _)| class)
                    .unwrap_or(0)
            })
            .collect();
        Ok(predictions)
    }

    /// Mean accuracy on the given data.
    pub fn score(&self, x: &DenseMatrix, y: &[usize]) -> Result<f64> {
        let predictions = self.predict(x)?;
        accuracy_score(y, &predictions)
    }

    /// Save the trained model as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a model from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let model = serde_json::from_str(&json)?;
        Ok(model)
    }

    fn check_ready(&self, x: &DenseMatrix) -> Result<()> {
        if !self.trained {
            return Err(XystonError::model(
                "Model must be trained before prediction",
            ));
        }
        if x.cols() != self.n_features {
            return Err(XystonError::model(format!(
                "Feature dimension mismatch: model expects {}, got {}",
                self.n_features,
                x.cols()
            )));
        }
        Ok(())
    }

    /// Numerically stable softmax over class logits for one sample.
    fn softmax_row(
        weights: &[f64],
        biases: &[f64],
        row: &[f32],
        n_classes: usize,
        dim: usize,
    ) -> Vec<f64> {
        let mut logits = vec![0.0f64; n_classes];
        for (class, logit) in logits.iter_mut().enumerate() {
            let weight_row = &weights[class * dim..(class + 1) * dim];
            *logit = weight_row
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * *x as f64)
                .sum::<f64>()
                + biases[class];
        }

        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut sum = 0.0;
        for logit in logits.iter_mut() {
            *logit = (*logit - max_logit).exp();
            sum += *logit;
        }
        for logit in logits.iter_mut() {
            *logit /= sum;
        }
        logits
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_data() -> (DenseMatrix, Vec<usize>) {
        let x = DenseMatrix::from_rows(vec![
            Vector::new(vec![1.0, 0.0]),
            Vector::new(vec![0.9, 0.1]),
            Vector::new(vec![0.8, 0.0]),
            Vector::new(vec![0.0, 1.0]),
            Vector::new(vec![0.1, 0.9]),
            Vector::new(vec![0.0, 0.8]),
        ])
        .unwrap();
        let y = vec![0, 0, 0, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (x, y) = separable_data();
        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();

        assert!(classifier.is_trained());
        assert_eq!(classifier.n_classes(), 2);
        assert_eq!(classifier.predict(&x).unwrap(), y);
        assert_eq!(classifier.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_three_classes() {
        let x = DenseMatrix::from_rows(vec![
            Vector::new(vec![1.0, 0.0, 0.0]),
            Vector::new(vec![0.9, 0.0, 0.1]),
            Vector::new(vec![0.0, 1.0, 0.0]),
            Vector::new(vec![0.1, 0.9, 0.0]),
            Vector::new(vec![0.0, 0.0, 1.0]),
            Vector::new(vec![0.0, 0.1, 0.9]),
        ])
        .unwrap();
        let y = vec![0, 0, 1, 1, 2, 2];

        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();

        assert_eq!(classifier.n_classes(), 3);
        assert_eq!(classifier.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = separable_data();
        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();

        let probs = classifier.predict_proba(&x).unwrap();
        assert_eq!(probs.rows(), x.rows());
        assert_eq!(probs.cols(), 2);
        for row in probs.iter_rows() {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_deterministic_fit() {
        let (x, y) = separable_data();

        let mut a = LogisticRegression::new();
        a.fit(&x, &y).unwrap();
        let mut b = LogisticRegression::new();
        b.fit(&x, &y).unwrap();

        assert_eq!(a.weights, b.weights);
        assert_eq!(a.biases, b.biases);
    }

    #[test]
    fn test_stronger_regularization_shrinks_weights() {
        let (x, y) = separable_data();

        let mut weak = LogisticRegression::with_config(LogisticRegressionConfig::with_c(10.0));
        weak.fit(&x, &y).unwrap();

        let mut strong = LogisticRegression::with_config(LogisticRegressionConfig::with_c(0.01));
        strong.fit(&x, &y).unwrap();

        assert!(strong.weight_norm() < weak.weight_norm());
    }

    #[test]
    fn test_training_stats_recorded() {
        let (x, y) = separable_data();
        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();

        let stats = classifier.training_stats().unwrap();
        assert!(stats.iterations > 0);
        assert_eq!(stats.training_losses.len(), stats.iterations);
        // Loss should decrease from the uninformed start
        assert!(stats.final_training_loss < stats.training_losses[0]);
        assert_eq!(classifier.metadata().training_examples, 6);
    }

    #[test]
    fn test_fit_validations() {
        let mut classifier = LogisticRegression::new();

        let empty = DenseMatrix::with_cols(2);
        assert!(classifier.fit(&empty, &[]).is_err());

        let x = DenseMatrix::from_rows(vec![Vector::new(vec![1.0])]).unwrap();
        assert!(classifier.fit(&x, &[0, 1]).is_err());

        // Single class is not trainable
        let x = DenseMatrix::from_rows(vec![
            Vector::new(vec![1.0]),
            Vector::new(vec![2.0]),
        ])
        .unwrap();
        assert!(classifier.fit(&x, &[0, 0]).is_err());
    }

    #[test]
    fn test_predict_validations() {
        let (x, y) = separable_data();

        let untrained = LogisticRegression::new();
        assert!(untrained.predict(&x).is_err());

        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();
        let wrong_dim = DenseMatrix::from_rows(vec![Vector::new(vec![1.0])]).unwrap();
        assert!(classifier.predict(&wrong_dim).is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (x, y) = separable_data();
        let mut classifier = LogisticRegression::new();
        classifier.fit(&x, &y).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        classifier.save(file.path()).unwrap();

        let loaded = LogisticRegression::load(file.path()).unwrap();
        assert!(loaded.is_trained());
        assert_eq!(loaded.predict(&x).unwrap(), y);
    }
}
