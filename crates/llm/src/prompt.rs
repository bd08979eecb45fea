//! Model prompt construction.

use deckgen_core::SCHEMA_INSTRUCTION;

/// Append the slide schema guardrail to a user prompt.
pub fn build_model_prompt(prompt: &str) -> String {
    format!("{}\n\n{}", prompt, SCHEMA_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_then_schema() {
        let prompt = build_model_prompt("Explain borrowing in Rust");
        assert!(prompt.starts_with("Explain borrowing in Rust\n\nOutput ONLY valid XML"));
        assert!(prompt.ends_with("</slide>"));
    }
}
