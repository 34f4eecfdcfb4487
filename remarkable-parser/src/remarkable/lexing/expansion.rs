//! Cartesian expansion of clauses
//!
//!     A claim is written as a sequence of clauses, each holding one or more alternative words.
//!     Expansion picks one word from every clause, in input order: the first clause varies
//!     slowest.
//!
//!         [a b] = [c d e]   =>   [a,c] [a,d] [a,e] [b,c] [b,d] [b,e]

use super::common::{Clause, RawClaim};

/// Expand clauses into every raw claim they describe.
///
/// No clauses, or any clause without alternatives, expands to nothing.
pub fn cartesian(clauses: &[Clause]) -> Vec<RawClaim> {
    if clauses.is_empty() {
        return Vec::new();
    }

    let mut crossed: Vec<RawClaim> = vec![Vec::with_capacity(clauses.len())];
    for clause in clauses {
        if clause.is_empty() {
            return Vec::new();
        }
        crossed = crossed
            .iter()
            .flat_map(|prefix| {
                clause.iter().map(move |word| {
                    let mut claim = prefix.clone();
                    claim.push(word.clone());
                    claim
                })
            })
            .collect();
    }
    crossed
}
