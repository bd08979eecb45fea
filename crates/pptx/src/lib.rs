//! PPTX (Office Open XML) backend for generated slide decks.
//!
//! Writes a [`deckgen_core::Deck`] as a .pptx package (a ZIP archive of
//! PresentationML parts) and reads the outline back out of one.

pub mod parts;
pub mod reader;
pub mod writer;

pub use parts::CONTENT_TYPE_PPTX;
pub use reader::PptxReader;
pub use writer::{PptxWriter, DEFAULT_DECK_FILENAME};
