//! Prompt validation.

use crate::error::{Error, Result};

/// Minimum prompt length, in characters, after trimming.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Maximum prompt length, in characters, after trimming.
pub const MAX_PROMPT_CHARS: usize = 20_000;

/// Validate a prompt and return it trimmed.
pub fn validate_prompt(prompt: &str) -> Result<&str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyPrompt);
    }

    let chars = trimmed.chars().count();
    if chars < MIN_PROMPT_CHARS {
        return Err(Error::PromptTooShort {
            min: MIN_PROMPT_CHARS,
        });
    }
    if chars > MAX_PROMPT_CHARS {
        return Err(Error::PromptTooLong {
            max: MAX_PROMPT_CHARS,
        });
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank() {
        assert!(matches!(validate_prompt(""), Err(Error::EmptyPrompt)));
        assert!(matches!(validate_prompt("  \n\t "), Err(Error::EmptyPrompt)));
    }

    #[test]
    fn test_too_short_after_trim() {
        assert!(matches!(
            validate_prompt("   short    "),
            Err(Error::PromptTooShort { min: 10 })
        ));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Nine characters, eighteen bytes.
        assert!(validate_prompt("ééééééééé").is_err());
        assert_eq!(validate_prompt("éééééééééé").unwrap(), "éééééééééé");
    }

    #[test]
    fn test_returns_trimmed() {
        assert_eq!(
            validate_prompt("  Slide: Rust basics  \n").unwrap(),
            "Slide: Rust basics"
        );
    }

    #[test]
    fn test_too_long() {
        let prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
        assert!(matches!(
            validate_prompt(&prompt),
            Err(Error::PromptTooLong { .. })
        ));
    }
}
