//! Evaluation metrics for classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XystonError};

/// Fraction of predictions matching the true labels.
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> Result<f64> {
    if y_true.is_empty() {
        return Err(XystonError::evaluation(
            "Cannot compute accuracy of an empty prediction set",
        ));
    }
    if y_true.len() != y_pred.len() {
        return Err(XystonError::evaluation(format!(
            "Label count mismatch: {} true, {} predicted",
            y_true.len(),
            y_pred.len()
        )));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// A labelled confusion matrix.
///
/// Rows are true classes, columns are predicted classes; cell `(i, j)`
/// counts samples of true class `i` predicted as class `j`. The `Display`
/// implementation renders the matrix as an aligned table with its class
/// labels, so it can be printed directly during an analysis session.
///
/// # Examples
///
/// ```
/// use xyston::ml::metrics::ConfusionMatrix;
///
/// let labels = vec!["spam".to_string(), "ham".to_string()];
/// let matrix = ConfusionMatrix::from_predictions(
///     &[0, 0, 1, 1],
///     &[0, 1, 1, 1],
///     labels,
/// ).unwrap();
///
/// assert_eq!(matrix.count(0, 0), 1); // spam predicted as spam
/// assert_eq!(matrix.count(0, 1), 1); // spam predicted as ham
/// assert_eq!(matrix.count(1, 1), 2); // ham predicted as ham
/// assert_eq!(matrix.accuracy(), 0.75);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Build a confusion matrix from true and predicted class indices.
    ///
    /// Class index `i` corresponds to `labels[i]`; any index outside the
    /// label range is an error.
    pub fn from_predictions(
        y_true: &[usize],
        y_pred: &[usize],
        labels: Vec<String>,
    ) -> Result<Self> {
        if labels.is_empty() {
            return Err(XystonError::evaluation(
                "Confusion matrix requires at least one label",
            ));
        }
        if y_true.len() != y_pred.len() {
            return Err(XystonError::evaluation(format!(
                "Label count mismatch: {} true, {} predicted",
                y_true.len(),
                y_pred.len()
            )));
        }

        let n = labels.len();
        let mut counts = vec![0usize; n * n];
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            if t >= n || p >= n {
                return Err(XystonError::evaluation(format!(
                    "Class index out of range: true={t}, predicted={p}, labels={n}"
                )));
            }
            counts[t * n + p] += 1;
        }

        Ok(Self { labels, counts })
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    /// The class labels, in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Count of samples with true class `true_idx` predicted as `pred_idx`.
    pub fn count(&self, true_idx: usize, pred_idx: usize) -> usize {
        self.counts[true_idx * self.labels.len() + pred_idx]
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Overall accuracy (diagonal mass over total).
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let n = self.labels.len();
        let correct: usize = (0..n).map(|i| self.count(i, i)).sum();
        correct as f64 / total as f64
    }

    /// Precision for a class, or `None` when the class was never predicted.
    pub fn precision(&self, class: usize) -> Option<f64> {
        let n = self.labels.len();
        let predicted: usize = (0..n).map(|i| self.count(i, class)).sum();
        if predicted == 0 {
            return None;
        }
        Some(self.count(class, class) as f64 / predicted as f64)
    }

    /// Recall for a class, or `None` when the class has no true samples.
    pub fn recall(&self, class: usize) -> Option<f64> {
        let n = self.labels.len();
        let actual: usize = (0..n).map(|j| self.count(class, j)).sum();
        if actual == 0 {
            return None;
        }
        Some(self.count(class, class) as f64 / actual as f64)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.labels.len();
        let row_header_width = self
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .unwrap_or(0)
            .max("true classes".len());

        let col_widths: Vec<usize> = (0..n)
            .map(|j| {
                let max_count = (0..n)
                    .map(|i| self.count(i, j).to_string().len())
                    .max()
                    .unwrap_or(1);
                self.labels[j].len().max(max_count) + 2
            })
            .collect();

        writeln!(f, "{:row_header_width$}  predicted classes", "")?;
        write!(f, "{:row_header_width$}", "true classes")?;
        for (j, &width) in col_widths.iter().enumerate() {
            write!(f, "{:>width$}", self.labels[j])?;
        }
        writeln!(f)?;

        for i in 0..n {
            write!(f, "{:row_header_width$}", self.labels[i])?;
            for (j, &width) in col_widths.iter().enumerate() {
                write!(f, "{:>width$}", self.count(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
