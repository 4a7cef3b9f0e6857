//! Error types for the Xyston library.
//!
//! This module provides comprehensive error handling for all Xyston operations.
//! All errors are represented by the [`XystonError`] enum, which provides
//! detailed information about what went wrong.
//!
//! # Examples
//!
//! ```
//! use xyston::error::{Result, XystonError};
//!
//! fn example_operation() -> Result<()> {
//!     // Return an error
//!     Err(XystonError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Xyston operations.
///
/// This enum represents all possible errors that can occur in the Xyston
/// library. It uses the `thiserror` crate for automatic `Error` trait
/// implementation and provides convenient constructor methods for creating
/// specific error types.
#[derive(Error, Debug)]
pub enum XystonError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Embedding-related errors (word-vector tables, aggregation, shapes)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Model-related errors (training, prediction, persistence)
    #[error("Model error: {0}")]
    Model(String),

    /// Evaluation-related errors (metrics, confusion matrices, splits)
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with XystonError.
pub type Result<T> = std::result::Result<T, XystonError>;

impl XystonError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        XystonError::Analysis(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        XystonError::Embedding(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        XystonError::Model(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        XystonError::Evaluation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        XystonError::Other(format!("Not found: {}", msg.into()))
    }
}
