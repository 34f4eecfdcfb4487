//! Individual transformation stages
//!
//! Each stage implements the `Runnable` trait.

pub mod assembly;
pub mod decoding;
pub mod resolution;

pub use assembly::AssembleTree;
pub use decoding::DecodeTokens;
pub use resolution::ResolveMetadata;
