//! Document pipeline facade
//!
//!     `Remarkable` holds one source document and exposes every stage of the pipeline:
//!
//!         markdown()     the source text
//!         lexed()        the flat token list from the format's tokenizer
//!         raw_tokens()   the tokens with metadata nodes inserted
//!         tokens()       the assembled document tree
//!
//!     Each stage recomputes the ones before it; nothing is cached between calls.
//!
//! ```rust,ignore
//! let doc = Remarkable::from_path("resume.md", PipelineOptions::default())?;
//! let tree = doc.tokens()?;
//! ```

use crate::error::FormatError;
use crate::registry::DEFAULT_REGISTRY;
use remarkable_parser::remarkable::document::DocumentTree;
use remarkable_parser::remarkable::options::PipelineOptions;
use remarkable_parser::remarkable::token::Token;
use remarkable_parser::remarkable::transforms::standard::{tokens_to_tree, RESOLVING};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Format used when none is given or detected
pub const DEFAULT_FORMAT: &str = "markdown";

/// A source document and the options to run it through the pipeline with
#[derive(Debug, Clone)]
pub struct Remarkable {
    source: String,
    format: String,
    options: PipelineOptions,
}

impl Remarkable {
    /// A markdown document held in memory
    pub fn from_string<S: Into<String>>(source: S, options: PipelineOptions) -> Self {
        Remarkable {
            source: source.into(),
            format: DEFAULT_FORMAT.to_string(),
            options,
        }
    }

    /// Read a document from disk, picking the format from its extension (markdown if unknown)
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: PipelineOptions,
    ) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let format = DEFAULT_REGISTRY.detect(path).unwrap_or(DEFAULT_FORMAT);
        debug!(path = %path.display(), format, "loaded document");
        Ok(Remarkable {
            source,
            format: format.to_string(),
            options,
        })
    }

    /// Use another registered format to tokenize the source
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The source text
    pub fn markdown(&self) -> &str {
        &self.source
    }

    /// The tokenizer output
    pub fn lexed(&self) -> Result<Vec<Token>, FormatError> {
        DEFAULT_REGISTRY.tokenize(&self.source, &self.format)
    }

    /// The tokens with metadata nodes inserted
    pub fn raw_tokens(&self) -> Result<Vec<Token>, FormatError> {
        Ok(RESOLVING.run(self.lexed()?)?)
    }

    /// The document tree
    pub fn tokens(&self) -> Result<DocumentTree, FormatError> {
        Ok(tokens_to_tree(self.options.clone()).run(self.lexed()?)?)
    }
}
