//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a prompt into a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// No prompt was supplied, or it was blank.
    #[error("No prompt provided")]
    EmptyPrompt,

    /// The prompt is below the minimum length.
    #[error("Prompt must be at least {min} characters long")]
    PromptTooShort { min: usize },

    /// The prompt exceeds the maximum length.
    #[error("Prompt must be at most {max} characters long")]
    PromptTooLong { max: usize },

    /// The slide source name is not recognized.
    #[error("Unknown slide source: {0}")]
    UnknownSource(String),

    /// Slide XML could not be parsed, even leniently.
    #[error("Could not parse XML content: {0}")]
    MalformedXml(String),

    /// Model output did not contain a `<slide>` element.
    #[error("No <slide>…</slide> found in model output")]
    MissingSlide,

    /// A deck must have at least one slide to be rendered.
    #[error("Cannot render a deck with no slides")]
    EmptyDeck,

    /// The model source was requested but no model is configured.
    #[error("Model source is not configured: {0}")]
    ModelUnavailable(String),

    /// Transport-level failure talking to the model endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The model endpoint answered with a non-success status.
    #[error("Model endpoint returned {status}: {body}")]
    ModelStatus { status: u16, body: String },

    /// The model endpoint answered with an unexpected payload.
    #[error("Unexpected model response: {0}")]
    ModelResponse(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error while reading PPTX parts.
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by
    /// this service or the model behind it.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyPrompt
                | Error::PromptTooShort { .. }
                | Error::PromptTooLong { .. }
                | Error::UnknownSource(_)
                | Error::MalformedXml(_)
                | Error::EmptyDeck
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_messages() {
        assert_eq!(Error::EmptyPrompt.to_string(), "No prompt provided");
        assert_eq!(
            Error::PromptTooShort { min: 10 }.to_string(),
            "Prompt must be at least 10 characters long"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::EmptyPrompt.is_client_error());
        assert!(Error::MalformedXml("x".into()).is_client_error());
        assert!(!Error::MissingSlide.is_client_error());
        assert!(!Error::Http("timeout".into()).is_client_error());
    }
}
