use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

use regex::Regex;

use super::document::RuleDocument;

/// Why a rule set could not be loaded or compiled.
///
/// Every variant is raised while building a [`RuleSet`]; converting text
/// never fails.
#[derive(thiserror::Error, Debug)]
pub enum RuleSetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid rule document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Letter key {0:?} must be exactly one character")]
    InvalidLetterKey(String),
    #[error("Letter {0:?} is mapped more than once")]
    DuplicateLetter(char),
    #[error("Fragment rule #{index} has an empty match pattern")]
    EmptyFragment { index: usize },
    #[error("Fragment pattern {pattern:?} does not compile: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Override source word {0:?} must be a single non-empty word")]
    InvalidOverride(String),
    #[error("Override for {0:?} is defined more than once (keys are case-insensitive)")]
    DuplicateOverride(String),
    #[error("Number key {0:?} is not a decimal numeral")]
    InvalidNumeral(String),
    #[error("Number {0:?} is defined more than once")]
    DuplicateNumeral(String),
}

/// Whether a fragment pattern is treated as a regular expression.
///
/// Only patterns anchored to the start of the text (`^...`) or ending in a
/// word boundary (`...\b`) are regexes; everything else is a literal
/// substring, so characters such as `.` or `-` need no escaping there.
pub fn is_pattern_syntax(pattern: &str) -> bool {
    pattern.starts_with('^') || pattern.ends_with("\\b")
}

/// How a fragment rule finds its matches.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Plain substring, replaced at every non-overlapping occurrence.
    Literal(String),
    /// Regex compiled at load; `$1` in the replacement expands groups.
    Pattern(Regex),
}

/// A compiled fragment rewrite.
#[derive(Debug, Clone)]
pub struct FragmentRule {
    matcher: Matcher,
    replace: String,
}

impl FragmentRule {
    /// Classify and compile one fragment rule.
    pub fn compile(pattern: &str, replace: &str) -> Result<Self, RuleSetError> {
        let matcher = if is_pattern_syntax(pattern) {
            let regex = Regex::new(pattern).map_err(|source| RuleSetError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            Matcher::Pattern(regex)
        } else {
            Matcher::Literal(pattern.to_string())
        };
        Ok(Self {
            matcher,
            replace: replace.to_string(),
        })
    }

    /// The compiled matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The pattern as written in the rule document.
    pub fn pattern(&self) -> &str {
        match &self.matcher {
            Matcher::Literal(literal) => literal,
            Matcher::Pattern(regex) => regex.as_str(),
        }
    }

    /// Replacement text, inserted verbatim for literal rules.
    pub fn replacement(&self) -> &str {
        &self.replace
    }

    /// True for regex rules.
    pub fn is_pattern(&self) -> bool {
        matches!(self.matcher, Matcher::Pattern(_))
    }
}

/// A validated, compiled rule set.
///
/// Built once and never mutated; share it between transliterators with an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    letters: HashMap<char, String>,
    fragments: Vec<FragmentRule>,
    overrides: HashMap<String, String>,
    /// Longest numeral first, ties in lexicographic order.
    numbers: Vec<(String, String)>,
}

impl RuleSet {
    /// Compile the bundled Esperanto rules.
    pub fn esperanto_default() -> Result<Self, RuleSetError> {
        Self::from_document(RuleDocument::esperanto_default()?)
    }

    /// Parse and compile a JSON rule document.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        Self::from_document(RuleDocument::from_json_str(json)?)
    }

    /// Read, parse and compile a JSON rule file.
    pub fn from_path(path: &Path) -> Result<Self, RuleSetError> {
        Self::from_document(RuleDocument::from_path(path)?)
    }

    /// Validate a document and compile it.
    ///
    /// Every regex fragment is compiled here, so a broken pattern is reported
    /// before any text is converted.
    pub fn from_document(document: RuleDocument) -> Result<Self, RuleSetError> {
        let mut letters = HashMap::with_capacity(document.letters.len());
        for (key, value) in document.letters.iter() {
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => return Err(RuleSetError::InvalidLetterKey(key.to_string())),
            };
            if letters.insert(ch, value.to_string()).is_some() {
                return Err(RuleSetError::DuplicateLetter(ch));
            }
        }

        let fragments = document
            .fragments
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                if entry.pattern.is_empty() {
                    return Err(RuleSetError::EmptyFragment { index });
                }
                FragmentRule::compile(&entry.pattern, &entry.replace)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut overrides = HashMap::with_capacity(document.overrides.len());
        for entry in &document.overrides {
            let word = &entry.source_word;
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(RuleSetError::InvalidOverride(word.clone()));
            }
            match overrides.entry(word.to_lowercase()) {
                Entry::Occupied(slot) => {
                    return Err(RuleSetError::DuplicateOverride(slot.key().clone()))
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry.replacement.clone());
                }
            }
        }

        let mut numbers: Vec<(String, String)> = Vec::with_capacity(document.numbers.len());
        for (key, value) in document.numbers.iter() {
            if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
                return Err(RuleSetError::InvalidNumeral(key.to_string()));
            }
            if numbers.iter().any(|(existing, _)| existing == key) {
                return Err(RuleSetError::DuplicateNumeral(key.to_string()));
            }
            numbers.push((key.to_string(), value.to_string()));
        }
        numbers.sort_by(|(a, _), (b, _)| (Reverse(a.len()), a).cmp(&(Reverse(b.len()), b)));

        log::info!(
            "Compiled rule set: {} letters, {} fragments ({} regex), {} overrides, {} numerals",
            letters.len(),
            fragments.len(),
            fragments.iter().filter(|rule| rule.is_pattern()).count(),
            overrides.len(),
            numbers.len()
        );

        Ok(Self {
            letters,
            fragments,
            overrides,
            numbers,
        })
    }

    /// Replacement for a single character, if the letter table has one.
    pub fn letter(&self, ch: char) -> Option<&str> {
        self.letters.get(&ch).map(String::as_str)
    }

    /// All letter mappings, in no particular order.
    pub fn letters(&self) -> impl Iterator<Item = (char, &str)> {
        self.letters.iter().map(|(ch, value)| (*ch, value.as_str()))
    }

    /// Fragment rules in application order.
    pub fn fragments(&self) -> &[FragmentRule] {
        &self.fragments
    }

    /// Look up a whole word, ignoring case.
    pub fn override_for(&self, word: &str) -> Option<&str> {
        self.overrides.get(&word.to_lowercase()).map(String::as_str)
    }

    /// Numeral expansions in application order.
    pub fn numbers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.numbers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::esperanto::document::{FragmentEntry, OverrideEntry, RuleDocumentBuilder};

    #[test]
    fn compiles_bundled_rules() {
        let rules = RuleSet::esperanto_default().unwrap();
        assert_eq!(rules.letter('ĉ'), Some("cz"));
        assert_eq!(rules.letter('x'), None);
        assert_eq!(rules.fragments().len(), 25);
        assert_eq!(rules.override_for("bv"), Some("bonvolu"));
    }

    #[test]
    fn classifies_fragments_by_anchor() {
        assert!(is_pattern_syntax("^sij"));
        assert!(is_pattern_syntax("io\\b"));
        assert!(!is_pattern_syntax("tsx"));
        assert!(!is_pattern_syntax("k.t.p"));
        // only a trailing boundary counts
        assert!(!is_pattern_syntax("\\bio"));

        let rules = RuleSet::esperanto_default().unwrap();
        let regexes: Vec<&str> = rules
            .fragments()
            .iter()
            .filter(|rule| rule.is_pattern())
            .map(FragmentRule::pattern)
            .collect();
        assert_eq!(
            regexes,
            vec![
                "ide\\b", "io\\b", "ioy\\b", "ioyn\\b", "feyo\\b", "feyoy\\b", "feyoyn\\b",
                "^ekzij", "^sij"
            ]
        );
    }

    #[test]
    fn orders_numerals_longest_first() {
        let rules = RuleSet::esperanto_default().unwrap();
        let keys: Vec<&str> = rules.numbers().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["1000000", "1000", "100", "10", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]
        );
    }

    #[test]
    fn override_lookup_is_case_insensitive() {
        let document = RuleDocumentBuilder::default()
            .overrides(vec![OverrideEntry::new("S-ro", "sjijnjoro")])
            .build()
            .unwrap();
        let rules = RuleSet::from_document(document).unwrap();
        assert_eq!(rules.override_for("s-ro"), Some("sjijnjoro"));
        assert_eq!(rules.override_for("S-RO"), Some("sjijnjoro"));
    }

    #[test]
    fn error_multi_char_letter_key() {
        let err = RuleSet::from_json_str(r#"{ "letters": { "cx": "cz" } }"#).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidLetterKey(key) if key == "cx"));
    }

    #[test]
    fn error_empty_letter_key() {
        let err = RuleSet::from_json_str(r#"{ "letters": { "": "x" } }"#).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidLetterKey(_)));
    }

    #[test]
    fn error_duplicate_letter() {
        let err = RuleSet::from_json_str(r#"{ "letters": { "c": "ts", "c": "c" } }"#).unwrap_err();
        assert!(matches!(err, RuleSetError::DuplicateLetter('c')));
    }

    #[test]
    fn error_invalid_regex_fragment() {
        let document = RuleDocumentBuilder::default()
            .fragments(vec![FragmentEntry::new("^(sij", "syy")])
            .build()
            .unwrap();
        let err = RuleSet::from_document(document).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidPattern { ref pattern, .. } if pattern == "^(sij"));
    }

    #[test]
    fn unbalanced_literal_is_not_compiled() {
        // no anchor, so this is a plain substring
        let document = RuleDocumentBuilder::default()
            .fragments(vec![FragmentEntry::new("(sij", "syy")])
            .build()
            .unwrap();
        let rules = RuleSet::from_document(document).unwrap();
        assert!(!rules.fragments()[0].is_pattern());
    }

    #[test]
    fn error_empty_fragment() {
        let document = RuleDocumentBuilder::default()
            .fragments(vec![FragmentEntry::new("tsx", "cz"), FragmentEntry::new("", "x")])
            .build()
            .unwrap();
        let err = RuleSet::from_document(document).unwrap_err();
        assert!(matches!(err, RuleSetError::EmptyFragment { index: 1 }));
    }

    #[test]
    fn error_duplicate_override_after_lowercasing() {
        let document = RuleDocumentBuilder::default()
            .overrides(vec![
                OverrideEntry::new("ok", "ohk"),
                OverrideEntry::new("OK", "okej"),
            ])
            .build()
            .unwrap();
        let err = RuleSet::from_document(document).unwrap_err();
        assert!(matches!(err, RuleSetError::DuplicateOverride(word) if word == "ok"));
    }

    #[test]
    fn error_override_with_whitespace() {
        let document = RuleDocumentBuilder::default()
            .overrides(vec![OverrideEntry::new("k t p", "ko-to-po")])
            .build()
            .unwrap();
        let err = RuleSet::from_document(document).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidOverride(_)));
    }

    #[test]
    fn error_non_numeric_number_key() {
        let err = RuleSet::from_json_str(r#"{ "numbers": { "1.5": "x" } }"#).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidNumeral(key) if key == "1.5"));
    }

    #[test]
    fn error_duplicate_numeral() {
        let err =
            RuleSet::from_json_str(r#"{ "numbers": { "7": "sep", "7": "sept" } }"#).unwrap_err();
        assert!(matches!(err, RuleSetError::DuplicateNumeral(key) if key == "7"));
    }

    #[test]
    fn error_malformed_json() {
        let err = RuleSet::from_json_str("{ \"letters\": [").unwrap_err();
        assert!(matches!(err, RuleSetError::Json(_)));
    }

    #[test]
    fn loads_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{ "fragments": [ { "match": "io\\b", "replace": "ijo" } ] }"#)
            .unwrap();
        let rules = RuleSet::from_path(&path).unwrap();
        assert!(rules.fragments()[0].is_pattern());
        assert_eq!(rules.fragments()[0].replacement(), "ijo");
    }
}
