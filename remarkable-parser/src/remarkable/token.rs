//! Tokenizer tokens
//!
//!     The markdown tokenizer is an external collaborator: it hands over an ordered token list
//!     and the rest of the library only relies on its shape. Every token has a `type`. It may
//!     carry `raw` (the source span, only looked at on `html` tokens), a `text`, nested token
//!     containers under `tokens` (inline content) or `items` (list items), and any number of
//!     type-specific fields (heading depth, list ordering, link target...) that are passed
//!     through untouched.
//!
//!     The resolver adds one more kind of token: `metadata`, whose fields are the resolved
//!     claims of one metadata comment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token type of resolved metadata nodes.
pub const METADATA: &str = "metadata";
/// Token type of raw html spans, including comments.
pub const HTML: &str = "html";
/// Token type of whitespace-only spans.
pub const SPACE: &str = "space";
/// Token type of plain text leaves.
pub const TEXT: &str = "text";

/// A single tokenizer token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Token>>,
    /// Type-specific fields, passed through unmodified.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Token {
    pub fn new(kind: impl Into<String>) -> Self {
        Token {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// A resolved metadata node carrying the given claims.
    pub fn metadata(fields: Map<String, Value>) -> Self {
        Token {
            kind: METADATA.to_string(),
            fields,
            ..Default::default()
        }
    }

    /// A text leaf, with `raw` and `text` both set to `text`.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Token::new(TEXT).with_raw(text.clone()).with_text(text)
    }

    /// An html span.
    pub fn html(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Token::new(HTML).with_raw(raw.clone()).with_text(raw)
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_items(mut self, items: Vec<Token>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_metadata(&self) -> bool {
        self.is(METADATA)
    }

    /// Whether the token exposes any nested token container.
    pub fn has_nested(&self) -> bool {
        self.tokens.is_some() || self.items.is_some()
    }

    /// Take every nested token, `tokens` first and `items` after, leaving both containers empty.
    pub fn take_nested(&mut self) -> Vec<Token> {
        let mut nested = self.tokens.take().unwrap_or_default();
        nested.extend(self.items.take().unwrap_or_default());
        nested
    }
}
