//! Markdown format implementation
//!
//!     Markdown is tokenized into the flat token list the resolver expects: block tokens in
//!     document order, inline tokens nested under `tokens`, list items under `items`. Metadata
//!     comments come through as `html` tokens, both as blocks and inline.
//!
//! Library
//!
//!     We use the comrak crate for parsing. Only the AST is used: tokens are built by walking
//!     it, with `raw` recovered from source positions.

mod parser;

pub use parser::tokenize_markdown;

use crate::error::FormatError;
use crate::format::Format;
use remarkable_parser::remarkable::token::Token;

/// Format implementation for CommonMark markdown
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark markdown with metadata comments"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_tokenizing(&self) -> bool {
        true
    }

    fn tokenize(&self, source: &str) -> Result<Vec<Token>, FormatError> {
        Ok(tokenize_markdown(source))
    }
}
