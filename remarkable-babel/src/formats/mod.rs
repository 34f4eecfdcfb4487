//! Format implementations
//!
//! Each format turns its source text into the flat token list consumed by the resolver.

pub mod json;
pub mod markdown;

pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
