//! Common lexer types
//!
//! Words, clauses and raw claims are transient: the lexer creates them and the resolver
//! consumes them right away.

use thiserror::Error;

/// A resolved word, or `None` for "use the default subject".
pub type Word = Option<String>;

/// The alternative words at one claim position, before expansion.
pub type Clause = Vec<Word>;

/// One fully expanded claim: subject, predicate, object and context words.
pub type RawClaim = Vec<Word>;

/// The clauses of one claim, before expansion.
pub type ClaimStructure = Vec<Clause>;

/// Errors raised while scanning a single metadata comment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A numeric escape named something that is not a Unicode scalar value
    #[error("escape sequence \\{sequence} does not name a character")]
    InvalidEscape { sequence: String },
}

/// Render a word so that lexing it back yields the same word.
///
/// Words are always quoted; `None` renders as nothing, which lexes back as an empty clause.
pub fn render_word(word: &Word) -> String {
    let Some(word) = word else {
        return String::new();
    };
    let mut out = String::with_capacity(word.len() + 2);
    out.push('"');
    for c in word.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render claim structures back into claim language, the inverse of
/// [scan_structure](super::scan_structure) up to escape decoding.
pub fn render_claims(claims: &[ClaimStructure]) -> String {
    claims
        .iter()
        .map(|claim| {
            claim
                .iter()
                .map(|clause| {
                    clause
                        .iter()
                        .map(render_word)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect::<Vec<_>>()
                .join(" = ")
        })
        .collect::<Vec<_>>()
        .join(" : ")
}
