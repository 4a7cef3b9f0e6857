//! Dataset splitting utilities for cross-validation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Result, XystonError};

/// K-fold cross-validation splitter.
///
/// Produces `n_splits` pairs of `(train_indices, test_indices)`. Every
/// sample appears in exactly one test fold, and fold sizes differ by at
/// most one. Splits are deterministic under a fixed seed.
///
/// # Examples
///
/// ```
/// use xyston::ml::split::KFold;
///
/// let kfold = KFold::new(3);
/// let folds = kfold.split(9).unwrap();
///
/// assert_eq!(folds.len(), 3);
/// for (train, test) in &folds {
///     assert_eq!(train.len(), 6);
///     assert_eq!(test.len(), 3);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl KFold {
    /// Create a shuffled k-fold splitter with a fixed default seed.
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: true,
            seed: 42,
        }
    }

    /// Set whether samples are shuffled before folding.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the shuffling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of folds.
    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Split `n_samples` indices into train/test fold pairs.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(XystonError::evaluation(
                "KFold requires at least 2 splits",
            ));
        }
        if n_samples < self.n_splits {
            return Err(XystonError::evaluation(format!(
                "Cannot split {} samples into {} folds",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed);
            indices.shuffle(&mut rng);
        }

        // The first (n_samples % n_splits) folds get one extra sample
        let base_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base_size + usize::from(fold < remainder);
            let test: Vec<usize> = indices[start..start + size].to_vec();
            let train: Vec<usize> = indices[..start]
                .iter()
                .chain(indices[start + size..].iter())
                .copied()
                .collect();
            folds.push((train, test));
            start += size;
        }

        Ok(folds)
    }
}

/// Split `n_samples` indices into a shuffled train/test pair.
///
/// `test_fraction` must be in `(0, 1)`; both sides of the split are
/// guaranteed non-empty.
pub fn train_test_split(
    n_samples: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&test_fraction) || test_fraction == 0.0 || test_fraction == 1.0 {
        return Err(XystonError::invalid_argument(format!(
            "test_fraction must be strictly between 0 and 1, got {test_fraction}"
        )));
    }
    if n_samples < 2 {
        return Err(XystonError::evaluation(
            "Need at least 2 samples to split",
        ));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_size = ((n_samples as f64) * test_fraction).round() as usize;
    let test_size = test_size.clamp(1, n_samples - 1);

    let test = indices[..test_size].to_vec();
    let train = indices[test_size..].to_vec();
    Ok((train, test))
}
