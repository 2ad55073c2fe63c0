use std::fmt;
use std::path::Path;

use derive_builder::Builder;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::rules::RuleSetError;

/// The bundled Esperanto → Polish-phonetic rule document.
pub const DEFAULT_RULES_JSON: &str = include_str!("default_rules.json");

/// Serializable source form of a rule set.
///
/// This is what ships as JSON. It is not validated; pass it to
/// [`RuleSet::from_document`](super::RuleSet::from_document) to check and
/// compile it.
///
/// ```
/// use tts_translit::engines::esperanto::{FragmentEntry, OverrideEntry, RuleDocumentBuilder};
///
/// let document = RuleDocumentBuilder::default()
///     .letters([("ĉ", "cz")])
///     .fragments(vec![FragmentEntry::new("^sij", "syy")])
///     .overrides(vec![OverrideEntry::new("bv", "bonvolu")])
///     .build()?;
/// assert_eq!(document.letters.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default, setter(into))]
pub struct RuleDocument {
    /// Single character → replacement, applied last.
    #[serde(default)]
    pub letters: RuleTable,
    /// Ordered fragment rewrites.
    #[serde(default)]
    pub fragments: Vec<FragmentEntry>,
    /// Whole-word replacements, applied first.
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
    /// Decimal numeral → spelled-out word.
    #[serde(default)]
    pub numbers: RuleTable,
}

impl RuleDocument {
    /// Parse the bundled Esperanto rule document.
    pub fn esperanto_default() -> Result<Self, RuleSetError> {
        log::debug!("Using bundled Esperanto rules");
        Self::from_json_str(DEFAULT_RULES_JSON)
    }

    /// Parse a rule document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a rule document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, RuleSetError> {
        log::debug!("Loading rules from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// One `{ "match": ..., "replace": ... }` fragment rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentEntry {
    #[serde(rename = "match")]
    pub pattern: String,
    pub replace: String,
}

impl FragmentEntry {
    pub fn new(pattern: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replace: replace.into(),
        }
    }
}

/// One whole-word override. Older rule files name the fields `eo` and `pl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(alias = "eo")]
    pub source_word: String,
    #[serde(alias = "pl")]
    pub replacement: String,
}

impl OverrideEntry {
    pub fn new(source_word: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            source_word: source_word.into(),
            replacement: replacement.into(),
        }
    }
}

/// A string → string JSON object kept in document order.
///
/// Repeated keys are kept as separate entries so validation can reject them
/// instead of silently keeping the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable(Vec<(String, String)>);

impl RuleTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for RuleTable {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for RuleTable {
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

impl Serialize for RuleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RuleTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of string to string")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RuleTable, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    entries.push((key, value));
                }
                Ok(RuleTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
