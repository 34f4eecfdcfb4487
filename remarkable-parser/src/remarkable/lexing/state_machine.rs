//! Claim language state machine
//!
//!     The scanner reads one comment body a character at a time. Each state owns a small rule
//!     table; a rule names what it matches, the state to move to, and the actions to run with
//!     the character. Within a table, rules are tried by priority: literal characters first,
//!     then character classes, then the catch-all. That priority matters: in the neutral
//!     state `=` must win over the catch-all that would start a bare word with it.
//!
//!     Outside quotes whitespace is a delimiter whose meaning depends on the state: it ends a
//!     bare word, or confirms a pending `=` (next clause) or `:` (next claim). A pending
//!     separator followed by anything else becomes the first character of a bare word.
//!
//!     Scanning state lives in a [Scanner] created per comment body, so nothing leaks between
//!     comments or runs.

use super::common::{ClaimStructure, Clause, LexError, RawClaim, Word};
use super::expansion::cartesian;

/// Scanner states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Between words
    #[default]
    Neutral,
    /// Saw `=`, waiting for whitespace to confirm a clause break
    ClauseBreak,
    /// Saw `:`, waiting for whitespace to confirm a claim break
    ClaimBreak,
    /// Inside a quoted string
    Quoted,
    /// Right after a backslash inside a quoted string
    Escape,
    /// `\x` read, expecting the first hex digit
    Hex,
    /// `\xH` read, expecting the second hex digit
    Hex1,
    /// `\u` read, expecting the first of four hex digits
    Unicode,
    Unicode1,
    Unicode2,
    Unicode3,
    /// Inside a bare word
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    Char(char),
    Whitespace,
    HexDigit,
    /// One of `b f n r t`
    ControlEscape,
    Any,
}

impl Matcher {
    fn matches(self, c: char) -> bool {
        match self {
            Matcher::Char(m) => m == c,
            Matcher::Whitespace => c.is_whitespace(),
            Matcher::HexDigit => c.is_ascii_hexdigit(),
            Matcher::ControlEscape => matches!(c, 'b' | 'f' | 'n' | 'r' | 't'),
            Matcher::Any => true,
        }
    }

    fn priority(self) -> u8 {
        match self {
            Matcher::Char(_) => 0,
            Matcher::Whitespace | Matcher::HexDigit | Matcher::ControlEscape => 1,
            Matcher::Any => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Hold the character until the state resolves
    Buffer,
    ClearBuffer,
    /// Open a word, flushing the buffer into it
    BeginWord,
    /// Open a word if needed and append the character
    AppendWord,
    EndWord,
    /// Decode the buffered escape sequence ending with the character
    EscapeSequence,
    NextClause,
    NextClaim,
}

#[derive(Debug)]
struct Rule {
    on: Matcher,
    to: State,
    run: &'static [Action],
}

const fn rule(on: Matcher, to: State, run: &'static [Action]) -> Rule {
    Rule { on, to, run }
}

use Action::*;
use Matcher::*;

const NEUTRAL: &[Rule] = &[
    rule(Whitespace, State::Neutral, &[]),
    rule(Char('='), State::ClauseBreak, &[Buffer]),
    rule(Char(':'), State::ClaimBreak, &[Buffer]),
    rule(Char('"'), State::Quoted, &[BeginWord]),
    rule(Any, State::Word, &[AppendWord]),
];

const CLAUSE_BREAK: &[Rule] = &[
    rule(Whitespace, State::Neutral, &[ClearBuffer, NextClause]),
    rule(Any, State::Word, &[AppendWord]),
];

const CLAIM_BREAK: &[Rule] = &[
    rule(Whitespace, State::Neutral, &[ClearBuffer, NextClaim]),
    rule(Any, State::Word, &[AppendWord]),
];

const QUOTED: &[Rule] = &[
    rule(Char('\\'), State::Escape, &[]),
    rule(Char('"'), State::Neutral, &[EndWord]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const ESCAPE: &[Rule] = &[
    rule(Char('"'), State::Quoted, &[AppendWord]),
    rule(Char('\\'), State::Quoted, &[AppendWord]),
    rule(Char('/'), State::Quoted, &[AppendWord]),
    rule(ControlEscape, State::Quoted, &[EscapeSequence]),
    rule(Char('x'), State::Hex, &[Buffer]),
    rule(Char('u'), State::Unicode, &[Buffer]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const HEX: &[Rule] = &[
    rule(HexDigit, State::Hex1, &[Buffer]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const HEX1: &[Rule] = &[
    rule(HexDigit, State::Quoted, &[EscapeSequence]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const UNICODE: &[Rule] = &[
    rule(HexDigit, State::Unicode1, &[Buffer]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const UNICODE1: &[Rule] = &[
    rule(HexDigit, State::Unicode2, &[Buffer]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const UNICODE2: &[Rule] = &[
    rule(HexDigit, State::Unicode3, &[Buffer]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const UNICODE3: &[Rule] = &[
    rule(HexDigit, State::Quoted, &[EscapeSequence]),
    rule(Any, State::Quoted, &[AppendWord]),
];

const WORD: &[Rule] = &[
    rule(Whitespace, State::Neutral, &[EndWord]),
    rule(Any, State::Word, &[AppendWord]),
];

/// Used when a table has no matching rule: start or continue a bare word.
static FALLBACK: Rule = rule(Any, State::Word, &[AppendWord]);

impl State {
    fn rules(self) -> &'static [Rule] {
        match self {
            State::Neutral => NEUTRAL,
            State::ClauseBreak => CLAUSE_BREAK,
            State::ClaimBreak => CLAIM_BREAK,
            State::Quoted => QUOTED,
            State::Escape => ESCAPE,
            State::Hex => HEX,
            State::Hex1 => HEX1,
            State::Unicode => UNICODE,
            State::Unicode1 => UNICODE1,
            State::Unicode2 => UNICODE2,
            State::Unicode3 => UNICODE3,
            State::Word => WORD,
        }
    }

    fn transition(self, c: char) -> &'static Rule {
        let rules = self.rules();
        (0..=2)
            .find_map(|priority| {
                rules
                    .iter()
                    .find(|rule| rule.on.priority() == priority && rule.on.matches(c))
            })
            .unwrap_or(&FALLBACK)
    }
}

/// Per-comment scanning context
#[derive(Debug, Default)]
struct Scanner {
    state: State,
    buffer: String,
    word: Option<String>,
    words: Vec<Word>,
    clauses: Vec<Clause>,
    claims: Vec<ClaimStructure>,
}

impl Scanner {
    fn step(&mut self, c: char) -> Result<(), LexError> {
        let rule = self.state.transition(c);
        self.state = rule.to;
        for action in rule.run {
            self.apply(*action, c)?;
        }
        Ok(())
    }

    fn apply(&mut self, action: Action, c: char) -> Result<(), LexError> {
        match action {
            Action::Buffer => self.buffer.push(c),
            Action::ClearBuffer => self.buffer.clear(),
            Action::BeginWord => self.begin_word(),
            Action::AppendWord => self.append_word(c),
            Action::EndWord => self.end_word(),
            Action::EscapeSequence => self.escape_sequence(c)?,
            Action::NextClause => self.next_clause(),
            Action::NextClaim => self.next_claim(),
        }
        Ok(())
    }

    fn begin_word(&mut self) {
        let word = self.word.get_or_insert_with(String::new);
        word.push_str(&self.buffer);
        self.buffer.clear();
    }

    fn append_word(&mut self, c: char) {
        self.begin_word();
        if let Some(word) = self.word.as_mut() {
            word.push(c);
        }
    }

    fn end_word(&mut self) {
        self.words.push(self.word.take());
    }

    fn escape_sequence(&mut self, c: char) -> Result<(), LexError> {
        let mut sequence = std::mem::take(&mut self.buffer);
        sequence.push(c);

        let decoded = match sequence.as_str() {
            "b" => '\u{8}',
            "f" => '\u{c}',
            "n" => '\n',
            "r" => '\r',
            "t" => '\t',
            numeric => {
                // the matchers only let hex digits follow the x/u prefix
                let digits = numeric.get(1..).unwrap_or_default();
                u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexError::InvalidEscape {
                        sequence: sequence.clone(),
                    })?
            }
        };
        self.append_word(decoded);
        Ok(())
    }

    fn next_clause(&mut self) {
        if self.word.is_some() {
            self.end_word();
        }
        let mut words = std::mem::take(&mut self.words);
        if words.is_empty() {
            words.push(None);
        }
        self.clauses.push(words);
    }

    fn next_claim(&mut self) {
        self.next_clause();
        let clauses = std::mem::take(&mut self.clauses);
        self.claims.push(clauses);
    }

    fn finish(mut self) -> Vec<ClaimStructure> {
        // a separator still pending in the buffer was never confirmed and is dropped
        self.next_claim();
        self.claims
    }
}

/// Scan a comment body into its claims, each still a list of clauses.
pub fn scan_structure(body: &str) -> Result<Vec<ClaimStructure>, LexError> {
    let mut scanner = Scanner::default();
    for c in body.chars() {
        scanner.step(c)?;
    }
    Ok(scanner.finish())
}

/// Scan a comment body into expanded raw claims.
pub fn scan(body: &str) -> Result<Vec<RawClaim>, LexError> {
    Ok(scan_structure(body)?
        .iter()
        .flat_map(|clauses| cartesian(clauses))
        .collect())
}
