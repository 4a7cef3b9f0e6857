//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step in the text analysis pipeline, responsible
//! for splitting input text into meaningful units (tokens).
//!
//! # Available Tokenizers
//!
//! - [`regex::RegexTokenizer`] - Custom regex-based tokenization (default)
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`unicode_word::UnicodeWordTokenizer`] - Uses Unicode word boundaries
//!
//! # Examples
//!
//! ```
//! use xyston::analysis::tokenizer::Tokenizer;
//! use xyston::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// All tokenizers must implement this trait to be used in the analysis
/// pipeline. The trait requires `Send + Sync` to allow use in concurrent
/// contexts.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

// Individual tokenizer modules
pub mod regex;
pub mod unicode_word;
pub mod whitespace;

// Re-export all tokenizers for convenient access
pub use regex::RegexTokenizer;
pub use unicode_word::UnicodeWordTokenizer;
pub use whitespace::WhitespaceTokenizer;
