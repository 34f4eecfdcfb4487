//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name or by file extension.

use crate::error::FormatError;
use crate::format::Format;
use once_cell::sync::Lazy;
use remarkable_parser::remarkable::token::Token;
use std::collections::HashMap;
use std::path::Path;

/// Registry holding the built-in formats
pub static DEFAULT_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::with_defaults);

/// Registry of token stream formats
///
/// ```ignore
/// let mut registry = FormatRegistry::new();
/// registry.register(MyFormat);
///
/// let format = registry.get("my-format")?;
/// let tokens = format.tokenize("source text")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name of the format handling the extension of `path`, if any
    pub fn detect(&self, path: &Path) -> Option<&str> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.formats
            .values()
            .find(|f| f.file_extensions().contains(&extension.as_str()))
            .map(|f| f.name())
    }

    /// Tokenize source text using the specified format
    pub fn tokenize(&self, source: &str, format: &str) -> Result<Vec<Token>, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_tokenizing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support tokenizing",
                format
            )));
        }
        fmt.tokenize(source)
    }

    /// Serialize tokens using the specified format
    pub fn serialize(&self, tokens: &[Token], format: &str) -> Result<String, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{}' does not support serialization",
                format
            )));
        }
        fmt.serialize(tokens)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::markdown::MarkdownFormat);
        registry.register(crate::formats::json::JsonFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
