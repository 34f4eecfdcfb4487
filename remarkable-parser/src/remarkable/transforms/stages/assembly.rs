//! Assembly stage - builds the document tree

use crate::remarkable::assembling::assemble;
use crate::remarkable::document::DocumentTree;
use crate::remarkable::options::PipelineOptions;
use crate::remarkable::token::Token;
use crate::remarkable::transforms::{Runnable, TransformError};

/// Assembles a resolved token stream with fixed options.
pub struct AssembleTree {
    options: PipelineOptions,
}

impl AssembleTree {
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default())
    }

    pub fn with_options(options: PipelineOptions) -> Self {
        Self { options }
    }
}

impl Default for AssembleTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Vec<Token>, DocumentTree> for AssembleTree {
    fn run(&self, input: Vec<Token>) -> Result<DocumentTree, TransformError> {
        Ok(assemble(input, &self.options))
    }
}
