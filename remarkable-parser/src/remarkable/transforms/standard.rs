//! Standard transform definitions
//!
//! Prebuilt pipelines, as `once_cell::sync::Lazy` statics. Pipelines that depend on
//! [`PipelineOptions`] are built by the functions at the bottom.

use crate::remarkable::document::DocumentTree;
use crate::remarkable::options::PipelineOptions;
use crate::remarkable::token::Token;
use crate::remarkable::transforms::stages::{AssembleTree, DecodeTokens, ResolveMetadata};
use crate::remarkable::transforms::Transform;
use once_cell::sync::Lazy;

/// Type alias for token stream transforms
pub type TokenTransform = Transform<Vec<Token>, Vec<Token>>;

/// Type alias for tree transforms
pub type TreeTransform = Transform<Vec<Token>, DocumentTree>;

/// Serialized token stream → tokens
pub static DECODING: Lazy<Transform<String, Vec<Token>>> =
    Lazy::new(|| Transform::from_fn(Ok).then(DecodeTokens::new()));

/// Tokens → tokens with metadata nodes inserted
pub static RESOLVING: Lazy<TokenTransform> =
    Lazy::new(|| Transform::from_fn(Ok).then(ResolveMetadata::new()));

/// Tokens → document tree, with default options
pub static TOKENS_TO_TREE: Lazy<TreeTransform> =
    Lazy::new(|| tokens_to_tree(PipelineOptions::default()));

/// Serialized token stream → document tree, with default options
pub static JSON_TO_TREE: Lazy<Transform<String, DocumentTree>> = Lazy::new(|| {
    Transform::from_fn(Ok)
        .then_transform(&*DECODING)
        .then_transform(&*TOKENS_TO_TREE)
});

/// Tokens → document tree
pub fn tokens_to_tree(options: PipelineOptions) -> TreeTransform {
    Transform::from_fn(Ok)
        .then(ResolveMetadata::new())
        .then(AssembleTree::with_options(options))
}

/// Serialized token stream → document tree
pub fn json_to_tree(options: PipelineOptions) -> Transform<String, DocumentTree> {
    Transform::from_fn(Ok)
        .then_transform(&*DECODING)
        .then(tokens_to_tree(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolving_inserts_metadata() {
        let tokens = RESOLVING
            .run(vec![Token::html("<!-- : card -->")])
            .unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_metadata());
    }

    #[test]
    fn test_json_to_tree() {
        let source = r#"[
            {"type": "html", "raw": "<!-- : card -->"},
            {"type": "paragraph", "raw": "Hi", "text": "Hi",
             "tokens": [{"type": "text", "raw": "Hi", "text": "Hi"}]}
        ]"#;
        let tree = JSON_TO_TREE.run(source.to_string()).unwrap();
        assert_eq!(
            tree.to_value(),
            json!([{
                "type": "card",
                "className": "metadata card",
                "children": [{ "type": "paragraph", "text": "Hi" }]
            }])
        );
    }

    #[test]
    fn test_options_reach_the_assembler() {
        let tokens = vec![Token::html("<br>")];
        let strict = TOKENS_TO_TREE.run(tokens.clone()).unwrap();
        let lenient = tokens_to_tree(PipelineOptions::default().with_allow_html(true))
            .run(tokens)
            .unwrap();
        assert!(strict.is_empty());
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn test_transforms_are_reusable() {
        let first = TOKENS_TO_TREE.run(vec![Token::text("a")]).unwrap();
        let second = TOKENS_TO_TREE.run(vec![Token::text("b")]).unwrap();
        assert_eq!(first.to_value(), json!([{ "type": "text", "text": "a" }]));
        assert_eq!(second.to_value(), json!([{ "type": "text", "text": "b" }]));
    }
}
