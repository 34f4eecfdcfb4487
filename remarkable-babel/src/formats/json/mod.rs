//! Serialized token streams
//!
//! A JSON array of tokens, as written by any tokenizer following the token contract. Useful to
//! feed the pipeline with the output of an external tokenizer, or to inspect tokens.

use crate::error::FormatError;
use crate::format::Format;
use remarkable_parser::remarkable::token::Token;

/// Format implementation for JSON token streams
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Token stream serialized as a JSON array"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_tokenizing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn tokenize(&self, source: &str) -> Result<Vec<Token>, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tokens)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
