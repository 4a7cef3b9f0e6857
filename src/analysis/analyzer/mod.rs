//! Analyzer implementations that combine tokenizers and filters.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// An analyzer is the "clean text" step of the crate: it owns the full
/// normalization pipeline that turns a raw document string into the token
/// sequence used for vocabulary lookups.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

// Individual analyzer modules
pub mod pipeline;
pub mod simple;
pub mod standard;

// Re-export all analyzers for convenient access
pub use pipeline::PipelineAnalyzer;
pub use simple::SimpleAnalyzer;
pub use standard::StandardAnalyzer;
