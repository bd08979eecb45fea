//! Core slide types, prompt validation, heuristic prompt splitting,
//! and slide XML handling for deck generation.

pub mod error;
pub mod outline;
pub mod prompt;
pub mod slide_xml;
pub mod types;

pub use error::{Error, Result};
pub use outline::split_prompt;
pub use prompt::validate_prompt;
pub use slide_xml::{extract_slide_fragment, parse_deck, write_deck, SCHEMA_INSTRUCTION};
pub use types::{Deck, Draft, Slide, SlideSource};
