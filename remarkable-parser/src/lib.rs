//! # remarkable
//!
//! Turns annotated markdown into a structured semantic tree.
//!
//! Metadata lives in html comments opened with a colon marker:
//!
//! ```text
//! <!-- : resume : name = "Jane Doe" : collections = skills -->
//! ```
//!
//! The library works on the token list produced by a markdown tokenizer (see the
//! `remarkable-babel` crate for one built on comrak) and runs three stages over it:
//!
//!   lexing       The claim language inside each metadata comment becomes raw claims.
//!   resolving    Raw claims become one metadata node per comment, inserted into the token stream.
//!   assembling   The flat stream is reassembled into a named, hierarchical document tree.
//!
//! The stages compose through [transforms](remarkable::transforms), the same way any
//! custom pipeline would.

#![allow(rustdoc::invalid_html_tags)]

pub mod remarkable;
