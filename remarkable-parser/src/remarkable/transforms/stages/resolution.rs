//! Resolution stage - inserts metadata tokens

use crate::remarkable::resolving::resolve;
use crate::remarkable::token::Token;
use crate::remarkable::transforms::{Runnable, TransformError};

/// Resolves every metadata comment of a token stream.
pub struct ResolveMetadata;

impl ResolveMetadata {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResolveMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Token>, Vec<Token>> for ResolveMetadata {
    fn run(&self, input: Vec<Token>) -> Result<Vec<Token>, TransformError> {
        Ok(resolve(input))
    }
}
