//! Remove empty filter implementation.
//!
//! This module provides a filter that removes empty tokens and stopped tokens
//! from the stream, cleaning up the token flow before vocabulary lookups.
//!
//! # Examples
//!
//! ```
//! use xyston::analysis::token::Token;
//! use xyston::analysis::token_filter::Filter;
//! use xyston::analysis::token_filter::remove_empty::RemoveEmptyFilter;
//!
//! let filter = RemoveEmptyFilter::new();
//! let tokens = vec![
//!     Token::new("hello", 0),
//!     Token::new("", 1),         // Will be removed
//!     Token::new("world", 2)
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "hello");
//! assert_eq!(result[1].text, "world");
//! ```

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that removes empty tokens from the stream.
///
/// This filter removes two types of tokens:
/// - Tokens with empty text (`text.is_empty()`)
/// - Tokens marked as stopped
///
/// This is typically used near the end of an analysis pipeline to clean up
/// tokens that have been emptied or stopped by previous filters.
#[derive(Clone, Debug, Default)]
pub struct RemoveEmptyFilter;

impl RemoveEmptyFilter {
    /// Create a new remove empty filter.
    pub fn new() -> Self {
        RemoveEmptyFilter
    }
}

impl Filter for RemoveEmptyFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| !token.is_empty() && !token.is_stopped())
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "remove_empty"
    }
}
