use std::sync::Arc;

use regex::Regex;

use crate::TextTransform;

use super::rules::{FragmentRule, Matcher, RuleSet, RuleSetError};
use super::spans::{Edit, Origin, Snapshot, SpanText};

/// Rule-driven text transliterator.
///
/// Conversion runs four stages over the input, in order:
///
/// 1. whole-word overrides (case-insensitive lookup, words rejoined with a
///    single space),
/// 2. numeral expansion, longest numeral first,
/// 3. fragment rewrites in rule order, each seeing the previous one's output,
/// 4. letter mapping, one character at a time.
///
/// Text produced by an override or a numeral is final: no later stage
/// touches it. Fragment output can be rewritten by later fragments but is
/// not passed through the letter table. Anything no rule matches is copied
/// through unchanged.
///
/// ```
/// use tts_translit::engines::esperanto::RuleBasedTransliterator;
///
/// let translit = RuleBasedTransliterator::esperanto()?;
/// assert_eq!(translit.convert("bv"), "bonvolu");
/// assert_eq!(translit.convert("ĉu"), "czu");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuleBasedTransliterator {
    rules: Arc<RuleSet>,
}

impl RuleBasedTransliterator {
    pub fn new(rules: RuleSet) -> Self {
        Self::from_shared(Arc::new(rules))
    }

    /// Build a transliterator over a rule set shared with other owners.
    pub fn from_shared(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Transliterator over the bundled Esperanto rules.
    pub fn esperanto() -> Result<Self, RuleSetError> {
        Ok(Self::new(RuleSet::esperanto_default()?))
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Convert `text`. Never fails; unmatched input passes through.
    pub fn convert(&self, text: &str) -> String {
        let mut working = self.apply_overrides(text);
        log::trace!("after overrides: {:?}", working.snapshot().text);

        for (numeral, word) in self.rules.numbers() {
            let snapshot = working.snapshot();
            let edits = literal_edits(&snapshot, numeral, word);
            working = working.splice(edits, Origin::Final);
        }
        log::trace!("after numbers: {:?}", working.snapshot().text);

        for rule in self.rules.fragments() {
            working = apply_fragment(rule, working);
        }
        log::trace!("after fragments: {:?}", working.snapshot().text);

        working.render(|piece, origin, out| match origin {
            Origin::Source => {
                for ch in piece.chars() {
                    match self.rules.letter(ch) {
                        Some(mapped) => out.push_str(mapped),
                        None => out.push(ch),
                    }
                }
            }
            Origin::Rewritten | Origin::Final => out.push_str(piece),
        })
    }

    fn apply_overrides(&self, text: &str) -> SpanText {
        let mut working = SpanText::default();
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                working.push(" ", Origin::Source);
            }
            match self.rules.override_for(word) {
                Some(replacement) => working.push(replacement, Origin::Final),
                None => working.push(word, Origin::Source),
            }
        }
        working
    }
}

impl TextTransform for RuleBasedTransliterator {
    fn transform(&self, text: &str) -> String {
        self.convert(text)
    }
}

fn apply_fragment(rule: &FragmentRule, working: SpanText) -> SpanText {
    let snapshot = working.snapshot();
    let edits = match rule.matcher() {
        Matcher::Literal(needle) => literal_edits(&snapshot, needle, rule.replacement()),
        Matcher::Pattern(regex) => pattern_edits(&snapshot, regex, rule.replacement()),
    };
    working.splice(edits, Origin::Rewritten)
}

/// Byte offset of the character after the one starting at `at`.
fn next_boundary(text: &str, at: usize) -> usize {
    at + text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Every non-overlapping occurrence of `needle`, left to right, that does
/// not overlap final text.
fn literal_edits(snapshot: &Snapshot, needle: &str, replacement: &str) -> Vec<Edit> {
    let text = snapshot.text.as_str();
    let mut edits = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let Some(found) = text[pos..].find(needle) else {
            break;
        };
        let start = pos + found;
        let range = start..start + needle.len();
        if snapshot.touches_final(&range) {
            pos = next_boundary(text, start);
            continue;
        }
        pos = range.end;
        edits.push(Edit {
            range,
            replacement: replacement.to_string(),
        });
    }
    edits
}

/// Like [`literal_edits`] for a regex; `$1`-style group references in the
/// replacement are expanded.
///
/// Matching runs on the whole text so `^` and `\b` see the real context.
fn pattern_edits(snapshot: &Snapshot, regex: &Regex, replacement: &str) -> Vec<Edit> {
    let text = snapshot.text.as_str();
    let mut edits = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let range = whole.range();
        if snapshot.touches_final(&range) {
            pos = next_boundary(text, range.start);
            continue;
        }
        pos = if range.is_empty() {
            next_boundary(text, range.end)
        } else {
            range.end
        };
        let mut expanded = String::new();
        caps.expand(replacement, &mut expanded);
        edits.push(Edit {
            range,
            replacement: expanded,
        });
    }
    edits
}
