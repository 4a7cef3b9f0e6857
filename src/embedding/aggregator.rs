//! Document encoding by word-vector averaging.
//!
//! The aggregator maps a text string to a fixed-length numeric vector by
//! tokenizing it, looking up each token in a word-vector table, and
//! averaging the found vectors. Documents with no known tokens encode to
//! the zero vector so downstream matrices keep a consistent shape.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use xyston::analysis::analyzer::StandardAnalyzer;
//! use xyston::embedding::aggregator::EmbeddingAggregator;
//! use xyston::embedding::word_vectors::InMemoryWordVectors;
//!
//! let table = InMemoryWordVectors::from_entries(vec![
//!     ("cat".to_string(), vec![1.0, 0.0]),
//!     ("dog".to_string(), vec![0.0, 1.0]),
//! ]).unwrap();
//!
//! let aggregator = EmbeddingAggregator::new(
//!     Arc::new(StandardAnalyzer::new().unwrap()),
//!     Arc::new(table),
//! );
//!
//! let embedding = aggregator.encode("cat dog").unwrap();
//! assert_eq!(embedding.data, vec![0.5, 0.5]);
//!
//! // Unknown-only documents fall back to the zero vector
//! let fallback = aggregator.encode("fish").unwrap();
//! assert_eq!(fallback.data, vec![0.0, 0.0]);
//! ```

use std::sync::Arc;

use rayon::prelude::*;

use crate::analysis::analyzer::Analyzer;
use crate::embedding::matrix::DenseMatrix;
use crate::embedding::vector::Vector;
use crate::embedding::word_vectors::WordVectors;
use crate::error::Result;

/// Encodes documents as the arithmetic mean of their word vectors.
///
/// The aggregator owns its analyzer and word-vector table explicitly; it
/// keeps no other state and never mutates the table, so a single instance
/// can encode any number of documents, concurrently if desired.
///
/// # Behavior
///
/// - Tokens are produced by the analyzer in document order.
/// - Tokens absent from the table are skipped.
/// - At least one match: element-wise mean of the matched vectors.
/// - Zero matches: the zero vector of the table's dimension. This is a
///   deliberate fallback so batch output always has N×D shape.
pub struct EmbeddingAggregator {
    analyzer: Arc<dyn Analyzer>,
    word_vectors: Arc<dyn WordVectors>,
}

impl EmbeddingAggregator {
    /// Create a new aggregator from an analyzer and a word-vector table.
    pub fn new(analyzer: Arc<dyn Analyzer>, word_vectors: Arc<dyn WordVectors>) -> Self {
        Self {
            analyzer,
            word_vectors,
        }
    }

    /// The dimension D of every embedding this aggregator produces.
    pub fn dimension(&self) -> usize {
        self.word_vectors.dimension()
    }

    /// Get the analyzer used for tokenization.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Get the word-vector table.
    pub fn word_vectors(&self) -> &Arc<dyn WordVectors> {
        &self.word_vectors
    }

    /// Encode a single document as a D-dimensional vector.
    pub fn encode(&self, text: &str) -> Result<Vector> {
        let dimension = self.word_vectors.dimension();
        let mut sum = vec![0.0f32; dimension];
        let mut matched = 0usize;

        for token in self.analyzer.analyze(text)? {
            if let Some(vector) = self.word_vectors.vector_for(&token.text) {
                for (acc, value) in sum.iter_mut().zip(vector.iter()) {
                    *acc += value;
                }
                matched += 1;
            }
        }

        if matched > 0 {
            let count = matched as f32;
            for value in &mut sum {
                *value /= count;
            }
        }

        Ok(Vector::new(sum))
    }

    /// Encode an ordered sequence of documents into an N×D matrix.
    ///
    /// Row `i` equals `encode(docs[i])`; documents do not interact.
    pub fn encode_batch<S: AsRef<str>>(&self, docs: &[S]) -> Result<DenseMatrix> {
        let mut matrix = DenseMatrix::with_cols(self.dimension());
        for doc in docs {
            let embedding = self.encode(doc.as_ref())?;
            matrix.push_row(&embedding.data)?;
        }
        Ok(matrix)
    }

    /// Encode documents in parallel across worker threads.
    ///
    /// Semantically identical to [`encode_batch`](Self::encode_batch): each
    /// document is independent and the table is read-only, so row `i` of the
    /// result is still the encoding of `docs[i]`.
    pub fn encode_batch_parallel<S: AsRef<str> + Sync>(&self, docs: &[S]) -> Result<DenseMatrix> {
        let embeddings: Result<Vec<Vector>> = docs
            .par_iter()
            .map(|doc| self.encode(doc.as_ref()))
            .collect();

        let embeddings = embeddings?;
        if embeddings.is_empty() {
            return Ok(DenseMatrix::with_cols(self.dimension()));
        }
        DenseMatrix::from_rows(embeddings)
    }
}

impl std::fmt::Debug for EmbeddingAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingAggregator")
            .field("analyzer", &self.analyzer.name())
            .field("dimension", &self.word_vectors.dimension())
            .field("vocabulary_size", &self.word_vectors.len())
            .finish()
    }
}
