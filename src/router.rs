use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::engines::esperanto::{RuleBasedTransliterator, RuleSetError};
use crate::TextTransform;

/// Picks a text transform by language code.
///
/// Text for a language without a registered transform is returned as-is.
/// Language codes are compared case-insensitively (`"EO"` == `"eo"`).
#[derive(Clone, Default)]
pub struct LanguageRouter {
    transforms: HashMap<String, Arc<dyn TextTransform>>,
}

impl LanguageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the bundled Esperanto transliterator registered as `"eo"`.
    pub fn with_esperanto_defaults() -> Result<Self, RuleSetError> {
        let mut router = Self::new();
        router.register("eo", RuleBasedTransliterator::esperanto()?);
        Ok(router)
    }

    /// Register `transform` for `lang`, replacing any previous one.
    pub fn register<T>(&mut self, lang: &str, transform: T) -> &mut Self
    where
        T: TextTransform + 'static,
    {
        self.transforms
            .insert(lang.to_ascii_lowercase(), Arc::new(transform));
        self
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.transforms.contains_key(&lang.to_ascii_lowercase())
    }

    /// Prepare `text` for a voice speaking `lang`.
    pub fn prepare<'a>(&self, lang: &str, text: &'a str) -> Cow<'a, str> {
        match self.transforms.get(&lang.to_ascii_lowercase()) {
            Some(transform) => Cow::Owned(transform.transform(text)),
            None => {
                log::debug!("No transform for language '{lang}', passing text through");
                Cow::Borrowed(text)
            }
        }
    }
}

impl std::fmt::Debug for LanguageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut langs: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        langs.sort_unstable();
        f.debug_struct("LanguageRouter")
            .field("languages", &langs)
            .finish()
    }
}
