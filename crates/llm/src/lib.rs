//! Remote model access for deck generation: the chat-completions client,
//! the schema-guarded model prompt, and the slide sources that draft decks.

pub mod client;
pub mod prompt;
pub mod source;

pub use client::{ChatClient, ModelConfig};
pub use prompt::build_model_prompt;
pub use source::draft;
