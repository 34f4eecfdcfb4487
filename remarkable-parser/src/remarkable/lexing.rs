//! Metadata lexer
//!
//!     This module turns the claim language found inside metadata comments into raw claims.
//!     A metadata comment is an html comment whose opening delimiter is followed by a colon
//!     marker:
//!
//!         <!-- : resume : name = "Jane Doe" : skill = rust go -->
//!
//!     Any number of hyphens may lengthen either delimiter (`<!--- : ... --->`).
//!
//! Grammar
//!
//!         claims  := claim (':' claim)*
//!         claim   := clause ('=' clause)*
//!         clause  := word*
//!         word    := bare-token | quoted-string
//!
//!     A clause holds the alternative words at one claim position, so `=` moves to the next
//!     position (subject, predicate, object, context...) and `:` starts a new claim. The
//!     separators only act as such where a word may start and when followed by whitespace, so
//!     bare words such as `https://example.com/?a=b` survive intact. An empty clause is legal
//!     and stands for the default subject (`None` here).
//!
//!     Quoted strings understand `\" \\ \/ \b \f \n \r \t \xHH \uHHHH`. Any other escaped
//!     character degrades to its literal form.
//!
//! Expansion
//!
//!     At every claim boundary the clauses of the claim are expanded into their Cartesian
//!     product, so `a b = c d e` yields six raw claims: `[a,c] [a,d] [a,e] [b,c] [b,d] [b,e]`.
//!     See [expansion](expansion).
//!
//! Failure policy
//!
//!     Comments that are not metadata comments are skipped. A scan failure on any comment of an
//!     html span discards the claims of the whole span: lexing never fails its caller.

pub mod comments;
pub mod common;
pub mod expansion;
pub mod state_machine;

pub use comments::{lex_metadata, metadata_body, try_lex_metadata};
pub use common::{render_claims, render_word, Clause, ClaimStructure, LexError, RawClaim, Word};
pub use expansion::cartesian;
pub use state_machine::{scan, scan_structure, State};
