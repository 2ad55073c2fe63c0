//! Esperanto → Polish-phonetic transliteration.
//!
//! Esperanto has no voice in most offline TTS packages, but its spelling is
//! close enough to Polish that a Polish voice reads it intelligibly once the
//! text is respelled. This module rewrites Esperanto text into that
//! approximate Polish spelling using a declarative rule set.
//!
//! # Rule Document
//!
//! Rules ship as JSON with four sections:
//!
//! ```text
//! {
//!   "letters":   { "ĉ": "cz", ... },                          // applied last, per character
//!   "fragments": [ { "match": "^sij", "replace": "syy" } ],   // in order
//!   "overrides": [ { "source_word": "bv", "replacement": "bonvolu" } ],
//!   "numbers":   { "100": "tsent", ... }                      // longest numeral first
//! }
//! ```
//!
//! A fragment `match` is a regex only when it starts with `^` or ends with
//! `\b`; otherwise it is a literal substring.
//!
//! | Input | Output | Rule |
//! |---|---|---|
//! | `ok` | `ohk` | override |
//! | `100` | `tsent` | number |
//! | `sij` | `syy` | anchored fragment |
//! | `ĉ` | `cz` | letter |
//!
//! # Examples
//!
//! ```rust
//! use tts_translit::engines::esperanto::{RuleBasedTransliterator, RuleSet};
//!
//! let rules = RuleSet::esperanto_default()?;
//! let translit = RuleBasedTransliterator::new(rules);
//!
//! assert_eq!(translit.convert("bv"), "bonvolu");
//! assert_eq!(translit.convert("5"), "kvijn");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod engine;
pub mod rules;
mod spans;

pub use document::{
    FragmentEntry, OverrideEntry, RuleDocument, RuleDocumentBuilder, RuleTable,
    DEFAULT_RULES_JSON,
};
pub use engine::RuleBasedTransliterator;
pub use rules::{FragmentRule, RuleSet, RuleSetError};
