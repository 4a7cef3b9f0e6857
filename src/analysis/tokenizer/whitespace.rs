//! Whitespace tokenizer implementation.

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// A tokenizer that splits text on whitespace.
///
/// Punctuation is kept attached to the neighboring word, so this tokenizer
/// is mostly useful for pre-cleaned input or as a building block in custom
/// pipelines.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut position = 0;
        let mut start = None;

        for (i, ch) in text.char_indices() {
            if ch.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token::with_offsets(&text[s..i], position, s, i));
                    position += 1;
                }
            } else if start.is_none() {
                start = Some(i);
            }
        }

        if let Some(s) = start {
            tokens.push(Token::with_offsets(&text[s..], position, s, text.len()));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}
