//! Token sources and the document pipeline for remarkable
//!
//!     This crate turns documents into the flat token list the remarkable parser consumes, and
//!     sequences the whole pipeline: load → tokenize → resolve → assemble.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for token sources (tokenizing and/or serialization)
//!     - FormatRegistry: discovery and selection of formats, by name or file extension
//!     - Format implementations: markdown (through comrak) and JSON token streams
//!     - Remarkable: the pipeline facade, one method per stage
//!
//!     This is a pure lib: it powers remarkable-cli but is shell agnostic, so no code here should
//!     print, read env vars or exit.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── pipeline.rs             # Remarkable facade
//!     ├── formats
//!     │   ├── json                # serialized token streams
//!     │   └── markdown            # comrak AST → tokens
//!     └── lib.rs
//!
//! Implementation Principles
//!
//!     Markdown parsing is offloaded to comrak; this crate only adapts its AST into tokens. The
//!     token shapes follow the usual markdown tokenizer contract (`heading` with `depth`,
//!     `list` with `items`, nested inline `tokens`, `raw` source text), so token streams written
//!     by other tokenizers can be fed in through the JSON format.

pub mod error;
pub mod format;
pub mod formats;
pub mod pipeline;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use pipeline::Remarkable;
pub use registry::FormatRegistry;
