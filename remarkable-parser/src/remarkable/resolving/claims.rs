//! Claim resolver
//!
//!     Builds one metadata node out of the raw claims of an html span. Each raw claim is
//!     normalized and then shaped by its length:
//!
//!         1. Runs of `None` words collapse into a single `None`.
//!         2. Remaining `None` words become the default subject `@this`.
//!         3. Leading `@this` words are dropped: claims are about the owning node unless
//!            another subject is named.
//!         4. By length:
//!              0   nothing
//!              1   `<value>`                           => `is <value>`
//!              2   `<predicate> <value>`               => predicate on the node
//!              3+  `<predicate> <value> <ctx>...`      => predicate on the node, repeated in
//!                                                         one nested `@ns:<ctx>` map per context
//!              3+  `@claims <claimant> <words>...`     => `<words>` shaped again, on the node
//!                                                         at `@claims.<claimant>`
//!
//!     Values accumulate: asserting a predicate twice turns it into a list, in assertion
//!     order.

use super::values::{set_or_append, with_map_entry, CLAIMS, DEFAULT_SUBJECT, NAMESPACE_PREFIX};
use crate::remarkable::lexing::{lex_metadata, RawClaim};
use serde_json::{Map, Value};
use tracing::trace;

/// A resolved metadata node: predicates, `@ns:*` namespaces and `@claims`.
pub type MetadataNode = Map<String, Value>;

/// Resolve every metadata comment in an html span into one node.
///
/// Returns `None` when no claim survives normalization.
pub fn resolve_metadata(html: &str) -> Option<MetadataNode> {
    let raw = lex_metadata(html);
    if raw.is_empty() {
        return None;
    }
    trace!(claims = raw.len(), "resolving metadata claims");

    let mut node = MetadataNode::new();
    for claim in raw {
        resolve_raw_claim(&mut node, claim);
    }

    if node.is_empty() {
        None
    } else {
        Some(node)
    }
}

/// Resolve a single raw claim against `node`.
pub fn resolve_raw_claim(node: &mut MetadataNode, claim: RawClaim) {
    let words = with_default_subject(collapse_none_runs(claim));
    let first_claimed = words
        .iter()
        .position(|word| word != DEFAULT_SUBJECT)
        .unwrap_or(words.len());
    shape_claim(node, &words[first_claimed..]);
}

/// Collapse consecutive `None` words into one.
pub fn collapse_none_runs(claim: RawClaim) -> RawClaim {
    let mut collapsed: RawClaim = Vec::with_capacity(claim.len());
    for word in claim {
        if word.is_none() && collapsed.last().is_some_and(Option::is_none) {
            continue;
        }
        collapsed.push(word);
    }
    collapsed
}

/// Replace `None` words with the default subject.
pub fn with_default_subject(claim: RawClaim) -> Vec<String> {
    claim
        .into_iter()
        .map(|word| word.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()))
        .collect()
}

fn shape_claim(node: &mut MetadataNode, words: &[String]) {
    match words {
        [] => {}
        [value] => set_or_append(node, "is", Value::String(value.clone())),
        [predicate, value] => set_or_append(node, predicate, Value::String(value.clone())),
        [first, claimant, rest @ ..] if first == CLAIMS => {
            with_map_entry(node, CLAIMS, |claims| {
                with_map_entry(claims, claimant, |claimed| shape_claim(claimed, rest));
            });
        }
        [predicate, value, context @ ..] => resolve_claim_about(node, predicate, value, context),
    }
}

fn resolve_claim_about(node: &mut MetadataNode, predicate: &str, value: &str, context: &[String]) {
    set_or_append(node, predicate, Value::String(value.to_string()));

    if let Some((namespace, inner)) = context.split_first() {
        with_map_entry(node, &format!("{NAMESPACE_PREFIX}{namespace}"), |namespaced| {
            resolve_claim_about(namespaced, predicate, value, inner);
        });
    }
}
