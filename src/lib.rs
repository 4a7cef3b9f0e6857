//! # Xyston
//!
//! An embedding-based text classification toolkit for Rust.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Flexible text analysis pipeline (tokenizers, filters, analyzers)
//! - Document encoding by word-vector averaging with a zero-vector fallback
//! - Bag-of-words and tf-idf vectorization
//! - Multinomial logistic regression with L2 regularization
//! - Cross-validated hyperparameter selection and grid search
//! - Labelled confusion matrices and accuracy metrics
//! - Sentiment scoring by per-token averaging

pub mod analysis;
pub mod embedding;
pub mod error;
pub mod ml;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
