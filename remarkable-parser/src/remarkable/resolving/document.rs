//! Document resolver
//!
//! Walks tokenizer output and inserts a `metadata` token in front of every html token whose
//! comments resolve to claims. The html token itself stays in place; nested `tokens` and
//! `items` are resolved recursively. Everything else passes through in order.

use super::claims::{resolve_metadata, MetadataNode};
use super::values::merge_into;
use crate::remarkable::token::{Token, HTML};

/// Resolve metadata comments throughout a token list.
pub fn resolve(tokens: Vec<Token>) -> Vec<Token> {
    let mut resolved = Vec::with_capacity(tokens.len());

    for mut token in tokens {
        if token.is(HTML) {
            if let Some(node) = token.raw.as_deref().and_then(resolve_metadata) {
                resolved.push(metadata_token(node));
            }
        }
        if let Some(nested) = token.tokens.take() {
            token.tokens = Some(resolve(nested));
        }
        if let Some(items) = token.items.take() {
            token.items = Some(resolve(items));
        }
        resolved.push(token);
    }

    resolved
}

/// Wrap a resolved node as a `metadata` token.
///
/// A declared `type` is folded into `is` first so it cannot clash with the token type.
pub fn metadata_token(mut node: MetadataNode) -> Token {
    merge_into(&mut node, "type", "is");
    Token::metadata(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_is_inserted_before_comment() {
        let tokens = vec![
            Token::html("<!-- : resume -->\n"),
            Token::new("paragraph").with_tokens(vec![Token::text("Hi")]),
        ];
        let resolved = resolve(tokens);

        assert_eq!(resolved.len(), 3);
        assert!(resolved[0].is_metadata());
        assert_eq!(resolved[0].fields["is"], json!("resume"));
        assert!(resolved[1].is(HTML));
        assert!(resolved[2].is("paragraph"));
    }

    #[test]
    fn test_plain_html_passes_through() {
        let tokens = vec![Token::html("<!-- todo -->"), Token::html("<br>")];
        assert_eq!(resolve(tokens.clone()), tokens);
    }

    #[test]
    fn test_nested_containers_are_resolved() {
        let item = Token::new("list_item").with_tokens(vec![
            Token::text("Rust "),
            Token::html("<!-- : skill = rust -->"),
        ]);
        let list = Token::new("list").with_items(vec![item]);
        let resolved = resolve(vec![list]);

        let inner = resolved[0].items.as_ref().unwrap()[0].tokens.as_ref().unwrap();
        assert_eq!(inner.len(), 3);
        assert!(inner[1].is_metadata());
        assert_eq!(inner[1].fields["skill"], json!("rust"));
    }

    #[test]
    fn test_declared_type_is_folded_into_is() {
        let token = metadata_token(
            json!({ "type": "card", "is": "project" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert!(token.is_metadata());
        assert_eq!(token.fields.get("type"), None);
        assert_eq!(token.fields["is"], json!(["project", "card"]));
    }
}
