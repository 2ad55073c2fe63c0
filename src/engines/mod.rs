//! Text transliteration engines.
//!
//! This module contains rule-driven converters that respell text so a voice
//! built for another language pronounces it acceptably.
//!
//! # Available Engines
//!
//! - `esperanto` - Esperanto → Polish-phonetic spelling

pub mod esperanto;
