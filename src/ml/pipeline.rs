//! Vectorizer + classifier pipeline.

use crate::error::{Result, XystonError};
use crate::ml::logistic::LogisticRegression;
use crate::ml::vectorizer::CountVectorizer;

/// A two-stage text classification pipeline: a count vectorizer feeding a
/// logistic regression classifier.
///
/// `fit` fits the vectorizer on the training documents only, then trains
/// the classifier on the resulting feature matrix; `predict` and `score`
/// reuse the fitted vocabulary.
pub struct TextClassifierPipeline {
    vectorizer: CountVectorizer,
    classifier: LogisticRegression,
}

impl TextClassifierPipeline {
    /// Create a pipeline from an unfitted vectorizer and classifier.
    pub fn new(vectorizer: CountVectorizer, classifier: LogisticRegression) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    /// Get the vectorizer stage.
    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    /// Get the classifier stage.
    pub fn classifier(&self) -> &LogisticRegression {
        &self.classifier
    }

    /// Check whether both stages have been fitted.
    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_fitted() && self.classifier.is_trained()
    }

    /// Fit both stages on a labeled training corpus.
    pub fn fit<S: AsRef<str> + Sync>(&mut self, documents: &[S], targets: &[usize]) -> Result<()> {
        if documents.len() != targets.len() {
            return Err(XystonError::model(format!(
                "Document/target count mismatch: {} documents, {} targets",
                documents.len(),
                targets.len()
            )));
        }

        let features = self.vectorizer.fit_transform(documents)?;
        self.classifier.fit(&features, targets)
    }

    /// Predict class indices for the given documents.
    pub fn predict<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Result<Vec<usize>> {
        let features = self.vectorizer.transform_batch(documents)?;
        self.classifier.predict(&features)
    }

    /// Mean accuracy on the given labeled documents.
    pub fn score<S: AsRef<str> + Sync>(&self, documents: &[S], targets: &[usize]) -> Result<f64> {
        let features = self.vectorizer.transform_batch(documents)?;
        self.classifier.score(&features, targets)
    }
}

impl std::fmt::Debug for TextClassifierPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextClassifierPipeline")
            .field("vectorizer", &self.vectorizer)
            .field("fitted", &self.is_fitted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;

    fn sample_pipeline() -> TextClassifierPipeline {
        let analyzer = Arc::new(StandardAnalyzer::new().unwrap());
        TextClassifierPipeline::new(
            CountVectorizer::new(analyzer),
            LogisticRegression::new(),
        )
    }

    fn sample_corpus() -> (Vec<String>, Vec<usize>) {
        let docs = vec![
            "rocket launch into orbit".to_string(),
            "orbit around the moon rocket".to_string(),
            "spacecraft orbit launch".to_string(),
            "engine repair manual car".to_string(),
            "car engine oil change".to_string(),
            "repair the car brake".to_string(),
        ];
        let targets = vec![0, 0, 0, 1, 1, 1];
        (docs, targets)
    }

    #[test]
    fn test_fit_predict_score() {
        let (docs, targets) = sample_corpus();
        let mut pipeline = sample_pipeline();
        pipeline.fit(&docs, &targets).unwrap();

        assert!(pipeline.is_fitted());
        assert_eq!(pipeline.predict(&docs).unwrap(), targets);
        assert_eq!(pipeline.score(&docs, &targets).unwrap(), 1.0);
    }

    #[test]
    fn test_generalizes_to_unseen_documents() {
        let (docs, targets) = sample_corpus();
        let mut pipeline = sample_pipeline();
        pipeline.fit(&docs, &targets).unwrap();

        let unseen = vec![
            "rocket orbit".to_string(),
            "car repair".to_string(),
        ];
        assert_eq!(pipeline.predict(&unseen).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let (docs, _) = sample_corpus();
        let mut pipeline = sample_pipeline();
        assert!(pipeline.fit(&docs, &[0, 1]).is_err());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let pipeline = sample_pipeline();
        assert!(pipeline.predict(&["anything".to_string()]).is_err());
    }
}
