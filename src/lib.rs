//! # tts-translit
//!
//! A Rust library that prepares text for speech synthesis by respelling it
//! for a voice of a different language.
//!
//! ## Features
//!
//! - **Esperanto → Polish phonetics**: Rule-based respelling so a Polish voice
//!   reads Esperanto intelligibly
//! - **Declarative Rules**: Letters, fragments, whole-word overrides and number
//!   words loaded from a JSON document
//! - **Language Routing**: Apply a transform only for the languages that need it
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tts-translit = "2026.2"
//! ```
//!
//! ```rust
//! use tts_translit::{engines::esperanto::RuleBasedTransliterator, LanguageRouter};
//!
//! let translit = RuleBasedTransliterator::esperanto()?;
//! assert_eq!(translit.convert("ĉu vi"), "czu wij");
//!
//! let mut router = LanguageRouter::new();
//! router.register("eo", translit);
//! assert_eq!(router.prepare("eo", "bv"), "bonvolu");
//! assert_eq!(router.prepare("de", "bv"), "bv");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engines;
pub mod router;

pub use router::LanguageRouter;

/// Common interface for text preprocessing ahead of synthesis.
///
/// Implementations must be pure: the same input always yields the same
/// output, and no state is shared between calls.
pub trait TextTransform: Send + Sync {
    /// Rewrite `text` for the target voice.
    fn transform(&self, text: &str) -> String;
}
