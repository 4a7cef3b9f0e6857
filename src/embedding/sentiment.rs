//! Sentiment scoring over word embeddings.
//!
//! A sentence's sentiment is computed token by token: each token present in
//! the word-vector table is mapped to a scalar score by a linear model over
//! its embedding, and the sentence score is the arithmetic mean of the
//! per-token scores. Sentences with no known tokens score a neutral `0.0`,
//! mirroring the aggregator's zero-vector fallback.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::embedding::matrix::DenseMatrix;
use crate::embedding::word_vectors::WordVectors;
use crate::error::{Result, XystonError};

/// Hyperparameters for training a linear sentiment model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentModelConfig {
    /// L2 penalty applied to the weights (ridge regression).
    pub l2_penalty: f64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Maximum number of gradient descent iterations.
    pub max_iterations: usize,
    /// Stop when the loss improves by less than this amount.
    pub tolerance: f64,
}

impl Default for SentimentModelConfig {
    fn default() -> Self {
        Self {
            l2_penalty: 0.01,
            learning_rate: 0.1,
            max_iterations: 500,
            tolerance: 1e-6,
        }
    }
}

/// A linear regression model mapping a D-dimensional embedding to a scalar
/// sentiment value.
///
/// This is the `vec_to_sentiment` step: trained once on labeled embeddings
/// (for example, a sentiment lexicon encoded through a word-vector table),
/// then applied per token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSentimentModel {
    weights: Vec<f32>,
    bias: f32,
    trained: bool,
    config: SentimentModelConfig,
}

impl LinearSentimentModel {
    /// Create an untrained model with the given configuration.
    pub fn new(config: SentimentModelConfig) -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            trained: false,
            config,
        }
    }

    /// Create a model directly from known weights and bias.
    pub fn from_parts(weights: Vec<f32>, bias: f32) -> Self {
        Self {
            weights,
            bias,
            trained: true,
            config: SentimentModelConfig::default(),
        }
    }

    /// Check if the model has been trained.
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// The embedding dimension this model scores.
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Train the model on labeled embeddings with ridge-regularized least
    /// squares by full-batch gradient descent.
    pub fn train(&mut self, x: &DenseMatrix, y: &[f32]) -> Result<()> {
        if x.rows() == 0 {
            return Err(XystonError::model("Cannot train on an empty dataset"));
        }
        if x.rows() != y.len() {
            return Err(XystonError::model(format!(
                "Row/label count mismatch: {} rows, {} labels",
                x.rows(),
                y.len()
            )));
        }

        let n = x.rows() as f64;
        let dim = x.cols();
        let mut weights = vec![0.0f64; dim];
        let mut bias = 0.0f64;
        let mut previous_loss = f64::INFINITY;

        for _ in 0..self.config.max_iterations {
            let mut weight_grads = vec![0.0f64; dim];
            let mut bias_grad = 0.0f64;
            let mut loss = 0.0f64;

            for (i, row) in x.iter_rows().enumerate() {
                let prediction: f64 = row
                    .iter()
                    .zip(weights.iter())
                    .map(|(a, w)| *a as f64 * w)
                    .sum::<f64>()
                    + bias;
                let residual = prediction - y[i] as f64;
                loss += residual * residual;

                for (grad, value) in weight_grads.iter_mut().zip(row.iter()) {
                    *grad += residual * *value as f64;
                }
                bias_grad += residual;
            }

            loss /= n;
            loss += self.config.l2_penalty * weights.iter().map(|w| w * w).sum::<f64>();

            for (w, grad) in weights.iter_mut().zip(weight_grads.iter()) {
                let regularized = 2.0 * (grad / n) + 2.0 * self.config.l2_penalty * *w;
                *w -= self.config.learning_rate * regularized;
            }
            bias -= self.config.learning_rate * 2.0 * (bias_grad / n);

            if (previous_loss - loss).abs() < self.config.tolerance {
                break;
            }
            previous_loss = loss;
        }

        self.weights = weights.into_iter().map(|w| w as f32).collect();
        self.bias = bias as f32;
        self.trained = true;
        Ok(())
    }

    /// Score a single embedding.
    pub fn score_vector(&self, vector: &[f32]) -> Result<f32> {
        if !self.trained {
            return Err(XystonError::model(
                "Sentiment model must be trained before scoring",
            ));
        }
        if vector.len() != self.weights.len() {
            return Err(XystonError::embedding(format!(
                "Vector dimension mismatch: expected {}, got {}",
                self.weights.len(),
                vector.len()
            )));
        }

        let score: f32 = vector
            .iter()
            .zip(self.weights.iter())
            .map(|(a, w)| a * w)
            .sum::<f32>()
            + self.bias;
        Ok(score)
    }

    /// Save the model as JSON.
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
}

/// Scores sentence sentiment by averaging per-token model scores.
pub struct SentimentScorer {
    analyzer: Arc<dyn Analyzer>,
    word_vectors: Arc<dyn WordVectors>,
    model: LinearSentimentModel,
}

impl SentimentScorer {
    /// Create a scorer from an analyzer, word-vector table, and a trained
    /// linear model.
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        word_vectors: Arc<dyn WordVectors>,
        model: LinearSentimentModel,
    ) -> Result<Self> {
        if !model.is_trained() {
            return Err(XystonError::model(
                "Sentiment scorer requires a trained model",
            ));
        }
        if model.dimension() != word_vectors.dimension() {
            return Err(XystonError::embedding(format!(
                "Model dimension {} does not match table dimension {}",
                model.dimension(),
                word_vectors.dimension()
            )));
        }
        Ok(Self {
            analyzer,
            word_vectors,
            model,
        })
    }

    /// Score each known token of `text` individually, in document order.
    pub fn token_scores(&self, text: &str) -> Result<Vec<(String, f32)>> {
        let mut scores = Vec::new();
        for token in self.analyzer.analyze(text)? {
            if let Some(vector) = self.word_vectors.vector_for(&token.text) {
                let score = self.model.score_vector(vector)?;
                scores.push((token.text, score));
            }
        }
        Ok(scores)
    }

    /// Score a sentence as the mean of its per-token scores.
    ///
    /// Returns the neutral score `0.0` when no tokens match the table.
    pub fn score(&self, text: &str) -> Result<f32> {
        let scores = self.token_scores(text)?;
        if scores.is_empty() {
            return Ok(0.0);
        }
        let sum: f32 = scores.iter().map(|(_, s)| s).sum();
        Ok(sum / scores.len() as f32)
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer")
            .field("analyzer", &self.analyzer.name())
            .field("dimension", &self.word_vectors.dimension())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::embedding::vector::Vector;
    use crate::embedding::word_vectors::InMemoryWordVectors;

    fn sample_scorer() -> SentimentScorer {
        let table = InMemoryWordVectors::from_entries(vec![
            ("good".to_string(), vec![1.0, 0.0]),
            ("bad".to_string(), vec![0.0, 1.0]),
        ])
        .unwrap();

        // Positive direction on axis 0, negative on axis 1
        let model = LinearSentimentModel::from_parts(vec![1.0, -1.0], 0.0);

        SentimentScorer::new(
            Arc::new(StandardAnalyzer::new().unwrap()),
            Arc::new(table),
            model,
        )
        .unwrap()
    }

    #[test]
    fn test_token_scores() {
        let scorer = sample_scorer();
        let scores = scorer.token_scores("good bad unknown").unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0], ("good".to_string(), 1.0));
        assert_eq!(scores[1], ("bad".to_string(), -1.0));
    }

    #[test]
    fn test_sentence_score_is_mean() {
        let scorer = sample_scorer();
        assert_eq!(scorer.score("good good").unwrap(), 1.0);
        assert_eq!(scorer.score("good bad").unwrap(), 0.0);
        assert_eq!(scorer.score("bad").unwrap(), -1.0);
    }

    #[test]
    fn test_neutral_fallback() {
        let scorer = sample_scorer();
        assert_eq!(scorer.score("nothing known here").unwrap(), 0.0);
        assert_eq!(scorer.score("").unwrap(), 0.0);
    }

    #[test]
    fn test_untrained_model_rejected() {
        let table = InMemoryWordVectors::from_entries(vec![("a".to_string(), vec![1.0])]).unwrap();
        let model = LinearSentimentModel::new(SentimentModelConfig::default());

        let result = SentimentScorer::new(
            Arc::new(StandardAnalyzer::new().unwrap()),
            Arc::new(table),
            model,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let table = InMemoryWordVectors::from_entries(vec![("a".to_string(), vec![1.0])]).unwrap();
        let model = LinearSentimentModel::from_parts(vec![1.0, 2.0], 0.0);

        let result = SentimentScorer::new(
            Arc::new(StandardAnalyzer::new().unwrap()),
            Arc::new(table),
            model,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_training_recovers_linear_signal() {
        // y = 2 * x[0] with a touch of ridge shrinkage
        let x = DenseMatrix::from_rows(vec![
            Vector::new(vec![1.0]),
            Vector::new(vec![2.0]),
            Vector::new(vec![3.0]),
            Vector::new(vec![-1.0]),
        ])
        .unwrap();
        let y = vec![2.0, 4.0, 6.0, -2.0];

        let mut model = LinearSentimentModel::new(SentimentModelConfig::default());
        model.train(&x, &y).unwrap();

        let prediction = model.score_vector(&[2.0]).unwrap();
        assert!((prediction - 4.0).abs() < 0.5, "prediction {prediction}");
    }

    #[test]
    fn test_train_validations() {
        let x = DenseMatrix::from_rows(vec![Vector::new(vec![1.0])]).unwrap();
        let mut model = LinearSentimentModel::new(SentimentModelConfig::default());

        assert!(model.train(&x, &[1.0, 2.0]).is_err());
        assert!(
            model
                .train(&DenseMatrix::with_cols(1), &[])
                .is_err()
        );
    }

    #[test]
    fn test_save_load_roundtrip() {
        let model = LinearSentimentModel::from_parts(vec![0.5, -0.5], 0.1);
        let file = tempfile::NamedTempFile::new().unwrap();
        model.save(file.path()).unwrap();

        let loaded = LinearSentimentModel::load(file.path()).unwrap();
        assert!(loaded.is_trained());
        assert_eq!(loaded.score_vector(&[1.0, 1.0]).unwrap(), 0.1);
    }
}
