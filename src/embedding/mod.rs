//! Word-embedding aggregation module.
//!
//! This module turns raw document strings into fixed-dimension numeric
//! vectors by averaging pretrained word vectors:
//!
//! - [`vector::Vector`] and [`matrix::DenseMatrix`] - dense numeric containers
//! - [`word_vectors::WordVectors`] - read-only token-to-vector table
//! - [`aggregator::EmbeddingAggregator`] - mean-of-word-vectors document encoder
//! - [`sentiment::SentimentScorer`] - per-token sentiment averaging

pub mod aggregator;
pub mod matrix;
pub mod sentiment;
pub mod vector;
pub mod word_vectors;

// Re-export commonly used types
pub use aggregator::EmbeddingAggregator;
pub use matrix::DenseMatrix;
pub use sentiment::{LinearSentimentModel, SentimentModelConfig, SentimentScorer};
pub use vector::Vector;
pub use word_vectors::{InMemoryWordVectors, WordVectors};
