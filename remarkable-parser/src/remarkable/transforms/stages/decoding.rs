//! Decoding stage - reads a serialized token stream

use crate::remarkable::token::Token;
use crate::remarkable::transforms::{Runnable, TransformError};

/// Parses the JSON output of a markdown tokenizer into tokens.
pub struct DecodeTokens;

impl DecodeTokens {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DecodeTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<String, Vec<Token>> for DecodeTokens {
    fn run(&self, input: String) -> Result<Vec<Token>, TransformError> {
        serde_json::from_str(&input).map_err(|e| TransformError::StageFailed {
            stage: "Decoding".to_string(),
            message: e.to_string(),
        })
    }
}
