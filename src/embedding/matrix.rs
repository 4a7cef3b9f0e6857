//! Row-major dense matrix for document/feature data.

use serde::{Deserialize, Serialize};

use crate::embedding::vector::Vector;
use crate::error::{Result, XystonError};

/// A dense row-major N×D matrix of `f32` values.
///
/// Rows correspond to documents (input order is preserved), columns to
/// embedding or feature dimensions. Every row has exactly `cols` entries,
/// regardless of how the row was produced.
///
/// # Examples
///
/// ```
/// use xyston::embedding::matrix::DenseMatrix;
/// use xyston::embedding::vector::Vector;
///
/// let matrix = DenseMatrix::from_rows(vec![
///     Vector::new(vec![1.0, 2.0]),
///     Vector::new(vec![3.0, 4.0]),
/// ]).unwrap();
///
/// assert_eq!(matrix.rows(), 2);
/// assert_eq!(matrix.cols(), 2);
/// assert_eq!(matrix.row(1), &[3.0, 4.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    /// Create a zero-filled matrix with the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create an empty matrix with the given column count.
    pub fn with_cols(cols: usize) -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols,
        }
    }

    /// Build a matrix from an ordered sequence of equal-dimension vectors.
    ///
    /// Row `i` of the result is `rows[i]`. Fails with an embedding error if
    /// the vectors do not share a single dimension.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self> {
        let cols = match rows.first() {
            Some(first) => first.dimension(),
            None => return Ok(Self::with_cols(0)),
        };

        let mut matrix = Self::with_cols(cols);
        for row in &rows {
            matrix.push_row(&row.data)?;
        }
        Ok(matrix)
    }

    /// Append a row to this matrix.
    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if row.len() != self.cols {
            return Err(XystonError::embedding(format!(
                "Row dimension mismatch: expected {}, got {}",
                self.cols,
                row.len()
            )));
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Get row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows()`.
    pub fn row(&self, i: usize) -> &[f32] {
        assert!(i < self.rows, "row index {} out of bounds ({})", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Get a mutable slice of row `i`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        assert!(i < self.rows, "row index {} out of bounds ({})", i, self.rows);
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Build a new matrix from the given row indices, in order.
    ///
    /// Used by cross-validation splits to materialize fold subsets.
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut selected = Self::with_cols(self.cols);
        for &i in indices {
            if i >= self.rows {
                return Err(XystonError::evaluation(format!(
                    "Row index {} out of bounds for matrix with {} rows",
                    i, self.rows
                )));
            }
            selected.push_row(self.row(i))?;
        }
        Ok(selected)
    }
}
