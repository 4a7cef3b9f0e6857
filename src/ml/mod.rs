//! Machine learning components for text classification.
//!
//! This module provides the supervised side of the crate: bag-of-words
//! vectorization, multinomial logistic regression, cross-validated
//! hyperparameter selection, grid search over vectorizer/classifier
//! pipelines, and evaluation metrics.

pub mod cv;
pub mod grid_search;
pub mod logistic;
pub mod metrics;
pub mod pipeline;
pub mod split;
pub mod vectorizer;

pub use cv::LogisticRegressionCV;
pub use grid_search::{GridPoint, GridSearch, ParamGrid};
pub use logistic::{LogisticRegression, LogisticRegressionConfig};
pub use metrics::{ConfusionMatrix, accuracy_score};
pub use pipeline::TextClassifierPipeline;
pub use split::{KFold, train_test_split};
pub use vectorizer::{CountVectorizer, VectorizerConfig, VectorizerMethod};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Model metadata for tracking model information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier.
    pub name: String,
    /// Model version.
    pub version: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Model hyperparameters.
    pub hyperparameters: HashMap<String, f64>,
}

impl ModelMetadata {
    /// Create metadata for an untrained model.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            version: "1.0".to_string(),
            trained_at: chrono::Utc::now(),
            training_examples: 0,
            hyperparameters: HashMap::new(),
        }
    }
}

/// Training statistics and performance metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Training loss curve.
    pub training_losses: Vec<f64>,
    /// Number of training iterations completed.
    pub iterations: usize,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
    /// Final training loss.
    pub final_training_loss: f64,
    /// Whether the tolerance-based stop was triggered before the iteration cap.
    pub converged: bool,
}
