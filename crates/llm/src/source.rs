//! Turning a prompt into a drafted deck.

use crate::client::ChatClient;
use crate::prompt::build_model_prompt;
use deckgen_core::{
    extract_slide_fragment, parse_deck, split_prompt, validate_prompt, write_deck, Draft, Error,
    Result, SlideSource,
};

/// Draft a deck from `prompt` using the given source.
///
/// The prompt is validated first. The model source needs a client and
/// fails with [`Error::ModelUnavailable`] without one.
pub async fn draft(
    source: SlideSource,
    prompt: &str,
    client: Option<&ChatClient>,
) -> Result<Draft> {
    let prompt = validate_prompt(prompt)?;

    match source {
        SlideSource::Heuristic => {
            let deck = split_prompt(prompt);
            log::debug!("Heuristic split produced {} slide(s)", deck.len());
            let xml = write_deck(&deck);
            Ok(Draft { source, deck, xml })
        }
        SlideSource::Model => {
            let client = client.ok_or_else(|| {
                Error::ModelUnavailable("no model client configured".to_string())
            })?;

            let raw = client.complete(&build_model_prompt(prompt)).await?;
            let fragment = extract_slide_fragment(&raw)?;
            let deck = parse_deck(fragment)?;
            log::debug!("Model output parsed into {} slide(s)", deck.len());

            Ok(Draft {
                source,
                deck,
                xml: fragment.to_string(),
            })
        }
    }
}
