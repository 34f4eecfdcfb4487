//! Property-based tests for the claim language scanner
//!
//! Claims text built by joining words with spaces, clauses with `=` and claims with `:`
//! must scan back into the same structure, and expansion must produce one raw claim per
//! combination of alternatives.

use proptest::prelude::*;
use remarkable_parser::remarkable::lexing::{
    lex_metadata, render_claims, scan, scan_structure, ClaimStructure, Clause,
};

/// Words worth quoting: separators, quotes, backslashes and control characters included
fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_.-]{0,8}",
        "[a-zA-Z0-9 :=\"\\\\@/\t\n\r\u{8}\u{c}\u{1}é-]{0,10}",
    ]
}

fn clause_strategy() -> impl Strategy<Value = Clause> {
    prop_oneof![
        1 => Just(vec![None]),
        4 => prop::collection::vec(word_strategy().prop_map(Some), 1..4),
    ]
}

fn claims_strategy() -> impl Strategy<Value = Vec<ClaimStructure>> {
    prop::collection::vec(prop::collection::vec(clause_strategy(), 1..4), 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_rendered_claims_scan_back(claims in claims_strategy()) {
        let body = format!(" {} ", render_claims(&claims));
        prop_assert_eq!(scan_structure(&body).unwrap(), claims);
    }

    #[test]
    fn test_expansion_count_is_product_of_alternatives(claims in claims_strategy()) {
        let body = format!(" {} ", render_claims(&claims));
        let expected: usize = claims
            .iter()
            .map(|claim| claim.iter().map(Vec::len).product::<usize>())
            .sum();
        prop_assert_eq!(scan(&body).unwrap().len(), expected);
    }

    #[test]
    fn test_every_raw_claim_has_one_word_per_position(claims in claims_strategy()) {
        let body = format!(" {} ", render_claims(&claims));
        let raw = scan(&body).unwrap();
        let mut offset = 0;
        for claim in &claims {
            let combinations: usize = claim.iter().map(Vec::len).product();
            for expanded in &raw[offset..offset + combinations] {
                prop_assert_eq!(expanded.len(), claim.len());
                for (word, clause) in expanded.iter().zip(claim) {
                    prop_assert!(clause.contains(word));
                }
            }
            offset += combinations;
        }
    }

    #[test]
    fn test_scanner_never_panics(body in "\\PC{0,40}") {
        let _ = scan(&body);
    }
}

fn w(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_alternatives_expand_first_position_slowest() {
    assert_eq!(
        lex_metadata("<!-- : a b = c d e -->"),
        vec![
            vec![w("a"), w("c")],
            vec![w("a"), w("d")],
            vec![w("a"), w("e")],
            vec![w("b"), w("c")],
            vec![w("b"), w("d")],
            vec![w("b"), w("e")],
        ]
    );
}

#[test]
fn test_escape_fidelity() {
    assert_eq!(
        lex_metadata(r#"<!-- : "\t\x41B" -->"#),
        vec![vec![w("\tAB")]]
    );
    assert_eq!(
        lex_metadata(r#"<!-- : "\t\x41\u0042" -->"#),
        vec![vec![w("\tAB")]]
    );
    assert_eq!(
        lex_metadata(r#"<!-- : "caf\u00e9" -->"#),
        vec![vec![w("caf\u{e9}")]]
    );
}

#[test]
fn test_unknown_escapes_degrade_to_literals() {
    assert_eq!(
        lex_metadata(r#"<!-- : "\q\/\"" -->"#),
        vec![vec![w("q/\"")]]
    );
}

#[test]
fn test_separators_inside_words_are_literal() {
    assert_eq!(
        lex_metadata("<!-- : link = https://example.com/?a=b -->"),
        vec![vec![w("link"), w("https://example.com/?a=b")]]
    );
    assert_eq!(
        lex_metadata("<!-- : a=b : c=d=e -->"),
        vec![vec![w("a=b")], vec![w("c=d=e")]]
    );
}

#[test]
fn test_empty_clauses_are_null_words() {
    assert_eq!(
        lex_metadata("<!-- : @claims = resume = contact = -->"),
        vec![vec![w("@claims"), w("resume"), w("contact"), None]]
    );
}

#[test]
fn test_rendered_claims_are_always_quoted() {
    let claims = vec![
        vec![vec![w("a"), w("b")], vec![w("c")]],
        vec![vec![None], vec![w("say \"hi\"")]],
        vec![vec![w("x")]],
    ];
    insta::assert_snapshot!(render_claims(&claims), @r#""a" "b" = "c" :  = "say \"hi\"" : "x""#);
}
