//! Format trait definition
//!
//! This module defines the Format trait that all token sources implement. A format turns its
//! source text into the flat token list the resolver consumes, and may write a token list back.

use crate::error::FormatError;
use remarkable_parser::remarkable::token::Token;

/// Trait for token stream formats
///
/// Implementors provide conversion between a string representation and a token list.
/// Formats can support tokenizing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_tokenizing(&self) -> bool {
///         true
///     }
///
///     fn tokenize(&self, source: &str) -> Result<Vec<Token>, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "markdown", "json")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions handled by this format, without the dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports tokenizing (source → tokens)
    fn supports_tokenizing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (tokens → source)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Tokenize source text
    ///
    /// Default implementation returns NotSupported error.
    fn tokenize(&self, _source: &str) -> Result<Vec<Token>, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support tokenizing",
            self.name()
        )))
    }

    /// Serialize a token list into source text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _tokens: &[Token]) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
