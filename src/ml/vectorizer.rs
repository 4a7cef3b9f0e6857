//! Bag-of-words featurization for text classification.

use std::sync::Arc;

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::embedding::matrix::DenseMatrix;
use crate::embedding::vector::Vector;
use crate::error::{Result, XystonError};

/// Configuration for the count vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Maximum vocabulary size. When set, only the most frequent corpus
    /// terms are kept (alphabetical tie-break).
    pub max_features: Option<usize>,
    /// Minimum number of documents a term must appear in.
    pub min_doc_freq: usize,
    /// Feature weighting method.
    pub method: VectorizerMethod,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: None,
            min_doc_freq: 1,
            method: VectorizerMethod::Count,
        }
    }
}

/// Feature weighting methods for text vectorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VectorizerMethod {
    /// Raw term counts.
    Count,
    /// Term frequency-inverse document frequency.
    TfIdf,
}

/// Converts documents into fixed-dimension term-count vectors.
///
/// The vectorizer is fitted once on a training corpus to learn a
/// vocabulary, then transforms any document into a vector over that
/// vocabulary. Tokens come from the analyzer, so casing and stop-word
/// handling follow the analysis pipeline.
///
/// Vocabulary indices are assigned in sorted term order, making transforms
/// deterministic across runs.
pub struct CountVectorizer {
    config: VectorizerConfig,
    analyzer: Arc<dyn Analyzer>,
    vocabulary: AHashMap<String, usize>,
    idf: Vec<f32>,
    n_documents: usize,
    fitted: bool,
}

impl CountVectorizer {
    /// Create an unfitted vectorizer with default configuration.
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self::with_config(VectorizerConfig::default(), analyzer)
    }

    /// Create an unfitted vectorizer with the given configuration.
    pub fn with_config(config: VectorizerConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            config,
            analyzer,
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
            n_documents: 0,
            fitted: false,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Check if the vectorizer has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Get the size of the learned vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Get the feature index of a vocabulary term.
    pub fn token_index(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    /// Fit the vectorizer on a training corpus.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(XystonError::model(
                "Cannot fit a vectorizer on an empty corpus",
            ));
        }

        self.n_documents = documents.len();
        let mut term_counts: AHashMap<String, usize> = AHashMap::new();
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for document in documents {
            let tokens = self.tokenize(document.as_ref())?;
            let unique_tokens: std::collections::HashSet<_> = tokens.iter().cloned().collect();

            for token in tokens {
                *term_counts.entry(token).or_insert(0) += 1;
            }
            for token in unique_tokens {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        // Prune rare terms, then cap the vocabulary at the most frequent
        // corpus terms
        let mut candidates: Vec<(String, usize)> = term_counts
            .into_iter()
            .filter(|(term, _)| {
                document_frequency.get(term).copied().unwrap_or(0) >= self.config.min_doc_freq
            })
            .collect();

        if let Some(max_features) = self.config.max_features {
            candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            candidates.truncate(max_features);
        }

        let mut terms: Vec<String> = candidates.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let mut vocabulary = AHashMap::with_capacity(terms.len());
        let mut idf = vec![0.0f32; terms.len()];
        for (index, term) in terms.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0);
            // IDF = log((N + 1) / (df + 1)) + 1
            idf[index] =
                (((self.n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0) as f32;
            vocabulary.insert(term, index);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.fitted = true;
        Ok(())
    }

    /// Transform a document into a feature vector over the learned
    /// vocabulary.
    pub fn transform(&self, document: &str) -> Result<Vector> {
        if !self.fitted {
            return Err(XystonError::InvalidOperation(
                "Vectorizer must be fitted before transforming".to_string(),
            ));
        }

        let tokens = self.tokenize(document)?;
        let mut features = vec![0.0f32; self.vocabulary.len()];

        for token in &tokens {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }

        if self.config.method == VectorizerMethod::TfIdf {
            let doc_length = tokens.len() as f32;
            if doc_length > 0.0 {
                for value in features.iter_mut() {
                    *value /= doc_length;
                }
            }
            for (value, idf) in features.iter_mut().zip(self.idf.iter()) {
                *value *= idf;
            }
        }

        Ok(Vector::new(features))
    }

    /// Transform an ordered sequence of documents into an N×V matrix.
    pub fn transform_batch<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<DenseMatrix> {
        let features: Result<Vec<Vector>> = documents
            .par_iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect();

        let features = features?;
        if features.is_empty() {
            return Ok(DenseMatrix::with_cols(self.vocabulary.len()));
        }
        DenseMatrix::from_rows(features)
    }

    /// Fit on a corpus and transform it in one step.
    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> Result<DenseMatrix> {
        self.fit(documents)?;
        self.transform_batch(documents)
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}

impl std::fmt::Debug for CountVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .field("method", &self.config.method)
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}
