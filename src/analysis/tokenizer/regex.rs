//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{Result, XystonError};

/// A regex-based tokenizer that extracts tokens using regular expressions.
///
/// This is the default tokenizer. The default pattern `\w+` matches
/// sequences of word characters, which reproduces the word splitting the
/// rest of the crate expects from cleaned text.
///
/// # Examples
///
/// ```
/// use xyston::analysis::tokenizer::Tokenizer;
/// use xyston::analysis::tokenizer::regex::RegexTokenizer;
///
/// let tokenizer = RegexTokenizer::new().unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("cat, dog!").unwrap().collect();
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].text, "cat");
/// assert_eq!(tokens[1].text, "dog");
/// ```
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the default pattern.
    ///
    /// The default pattern `r"\w+"` matches sequences of word characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(r"\w+")
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| XystonError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new().expect("Default regex pattern should be valid")
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<_> = tokenizer.tokenize("hello, world! 42").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[2].text, "42");
    }

    #[test]
    fn test_offsets() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<_> = tokenizer.tokenize("ab cd").unwrap().collect();

        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 2);
        assert_eq!(tokens[1].start_offset, 3);
        assert_eq!(tokens[1].end_offset, 5);
        assert_eq!(tokens[1].position, 1);
    }

    #[test]
    fn test_custom_pattern() {
        let tokenizer = RegexTokenizer::with_pattern(r"[a-z]+").unwrap();
        let tokens: Vec<_> = tokenizer.tokenize("abc123def").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "abc");
        assert_eq!(tokens[1].text, "def");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexTokenizer::with_pattern("[unclosed").is_err());
    }

    #[test]
    fn test_empty_input() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<_> = tokenizer.tokenize("").unwrap().collect();
        assert!(tokens.is_empty());
    }
}
