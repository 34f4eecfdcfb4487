//! Token stream loading
//!
//! `TokenLoader` reads the serialized output of a markdown tokenizer (a JSON array of tokens)
//! from a file or a string and runs transforms on it.
//!
//! ```rust,ignore
//! use remarkable_parser::remarkable::loader::TokenLoader;
//!
//! let tree = TokenLoader::from_path("resume.tokens.json")?.tree()?;
//! let resolved = TokenLoader::from_string(json).resolved()?;
//! ```

use crate::remarkable::document::DocumentTree;
use crate::remarkable::options::PipelineOptions;
use crate::remarkable::token::Token;
use crate::remarkable::transforms::standard::{json_to_tree, DECODING, RESOLVING};
use crate::remarkable::transforms::{Transform, TransformError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error that can occur when loading token streams
#[derive(Debug, Error)]
pub enum LoaderError {
    /// IO error when reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Decoding or transform error
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Serialized token stream with transform shortcuts
pub struct TokenLoader {
    source: String,
}

impl TokenLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let source = fs::read_to_string(path)?;
        Ok(TokenLoader { source })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        TokenLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// The decoded tokens
    pub fn tokens(&self) -> Result<Vec<Token>, LoaderError> {
        self.with(&DECODING)
    }

    /// The tokens with metadata resolved
    pub fn resolved(&self) -> Result<Vec<Token>, LoaderError> {
        Ok(RESOLVING.run(self.tokens()?)?)
    }

    /// The document tree, with default options
    pub fn tree(&self) -> Result<DocumentTree, LoaderError> {
        self.tree_with(PipelineOptions::default())
    }

    pub fn tree_with(&self, options: PipelineOptions) -> Result<DocumentTree, LoaderError> {
        self.with(&json_to_tree(options))
    }

    /// Get a reference to the raw source string
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const TOKENS: &str = r#"[
        {"type": "html", "raw": "<!-- : skill : name = rust -->\n"},
        {"type": "space", "raw": "\n"},
        {"type": "paragraph", "raw": "Rust", "text": "Rust",
         "tokens": [{"type": "text", "raw": "Rust", "text": "Rust"}]}
    ]"#;

    #[test]
    fn test_from_string() {
        let loader = TokenLoader::from_string(TOKENS);
        assert_eq!(loader.tokens().unwrap().len(), 3);
        assert_eq!(loader.source(), TOKENS);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TOKENS.as_bytes()).unwrap();
        let loader = TokenLoader::from_path(file.path()).unwrap();
        assert_eq!(loader.resolved().unwrap().len(), 4);
    }

    #[test]
    fn test_from_path_nonexistent() {
        let result = TokenLoader::from_path("nonexistent.tokens.json");
        assert!(matches!(result, Err(LoaderError::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = TokenLoader::from_string("not json").tree();
        assert!(matches!(result, Err(LoaderError::Transform(_))));
    }

    #[test]
    fn test_tree() {
        let tree = TokenLoader::from_string(TOKENS).tree().unwrap();
        assert_eq!(
            tree.to_value(),
            json!([{
                "type": "skill",
                "className": "metadata skill",
                "name": "rust",
                "children": [{ "type": "paragraph", "text": "Rust" }]
            }])
        );
    }

    #[test]
    fn test_tree_with_options() {
        let options = PipelineOptions::default().with_retain_space(true);
        let tree = TokenLoader::from_string(TOKENS).tree_with(options).unwrap();
        let nodes = tree.nodes();
        assert_eq!(nodes[0]["children"][0], json!({ "type": "space" }));
    }
}
