//! Metadata comment extraction
//!
//! Finds html comments in a raw html span, keeps the ones carrying the metadata marker and
//! hands their bodies to the scanner.

use super::common::{LexError, RawClaim};
use super::state_machine::scan;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{trace, warn};

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());
static BEGIN_METADATA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!---*\s+:").unwrap());
static END_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"-*-->$").unwrap());

/// The claim text of a metadata comment, delimiters and marker stripped.
///
/// Returns `None` for comments without the marker. The marker must be followed by whitespace,
/// so `<!--:x-->` and `<!-- :x -->` are ordinary comments.
pub fn metadata_body(comment: &str) -> Option<&str> {
    let begin = BEGIN_METADATA.find(comment)?;
    let rest = &comment[begin.end()..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let end = END_COMMENT.find(rest)?;
    Some(&rest[..end.start()])
}

/// Lex every metadata comment in an html span, propagating scan failures.
pub fn try_lex_metadata(html: &str) -> Result<Vec<RawClaim>, LexError> {
    let mut raw = Vec::new();
    for comment in COMMENT.find_iter(html) {
        let Some(body) = metadata_body(comment.as_str()) else {
            trace!(comment = comment.as_str(), "skipping comment without metadata marker");
            continue;
        };
        raw.extend(scan(body)?);
    }
    Ok(raw)
}

/// Lex every metadata comment in an html span.
///
/// Fail-soft: if any comment fails to scan, the span yields no claims at all.
pub fn lex_metadata(html: &str) -> Vec<RawClaim> {
    try_lex_metadata(html).unwrap_or_else(|err| {
        warn!(error = %err, "discarding metadata claims of html span");
        Vec::new()
    })
}
