//! # ltwa
//!
//! ISO 4 abbreviation of serial and journal titles, driven by the LTWA
//! (List of Title Word Abbreviations) published by the ISSN Centre.
//!
//! The engine is built once from the raw LTWA and a short-word list, then
//! answers queries as pure functions: no I/O, no interior mutability, safe
//! to share across threads.
//!
//! ```
//! let dictionary = "PATTERN\tREPLACEMENT\tLANGUAGES\n\
//!     international\tInt.\tmul\n\
//!     journal\tJ.\tmul\n\
//!     science\tSci.\tmul\n";
//! let engine = ltwa::Engine::new(dictionary, "of\nthe\n").unwrap();
//!
//! let abbrev = engine.make_abbreviation("International Journal of Science", None, None);
//! assert_eq!(abbrev, "Int. J. Sci.");
//! ```
//!
//! Matching is not plain substring search: LTWA patterns apply under a
//! collation equivalence that unifies ligatures, diacritics, and a few
//! foreign letters with their ASCII forms ([`collate`]), candidate
//! patterns are pruned through bucketed prefix trees ([`trie`]), and
//! overlapping matches are resolved by the priority rules of ISO 4 before
//! substitution.

pub mod collate;
pub mod engine;
pub mod matcher;
pub mod pattern;
mod planner;
pub mod trie;

pub use engine::Engine;
pub use matcher::Match;
pub use pattern::{ParseError, Pattern, NOT_ABBREVIATED};
