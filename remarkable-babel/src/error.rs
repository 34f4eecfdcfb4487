//! Error types for format conversion

use remarkable_parser::remarkable::transforms::TransformError;
use thiserror::Error;

/// Errors that can occur while tokenizing, serializing or running the pipeline
#[derive(Debug, Error)]
pub enum FormatError {
    /// Error during tokenizing
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    /// Operation not supported by this format
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline stage failed
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}
