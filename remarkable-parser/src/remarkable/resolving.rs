//! Claim resolution
//!
//!     Resolution sits between the metadata lexer and the tree transformer. It has two
//!     layers:
//!
//!         1. The claim resolver ([claims]) turns the raw claims of one html span into a single
//!            metadata node: a map of predicates, namespaced sub-maps (`@ns:<context>`) and
//!            claims made by other subjects (`@claims`).
//!
//!         2. The document resolver ([document]) walks the tokenizer output, replaces every
//!            html token carrying metadata with a `metadata` token built from that node, and
//!            recurses into nested token containers.
//!
//!     Resolution is purely structural. Nothing is dropped except comments whose claims
//!     resolve to nothing.

pub mod claims;
pub mod document;
pub mod values;

pub use claims::{resolve_metadata, resolve_raw_claim, MetadataNode};
pub use document::{metadata_token, resolve};
pub use values::{
    merge_into, set_or_append, with_map_entry, CLAIMS, DEFAULT_SUBJECT, NAMESPACE_PREFIX,
};
