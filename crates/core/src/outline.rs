//! Heuristic prompt splitting.
//!
//! Turns a free-text prompt into slides using simple line prefixes:
//! `Slide:`/`Slide `/`1.`..`5.` open a slide, `Topic:`/`Title:` open the
//! first one, and every other line becomes a bullet of the open slide.

use crate::types::{Deck, Slide};
use unicode_normalization::UnicodeNormalization;

/// Line prefixes that always start a new slide.
const SLIDE_PREFIXES: &[&str] = &["Slide:", "Slide ", "1.", "2.", "3.", "4.", "5."];

/// Line prefixes that start a slide only when none is open yet.
const HEADING_PREFIXES: &[&str] = &["Topic:", "Title:"];

/// Bullet markers stripped from the start of content lines.
const BULLET_MARKERS: &[char] = &['-', '•', '*'];

/// Title used when the prompt contains no slide indicators.
pub const FALLBACK_TITLE: &str = "Presentation";

/// Split a prompt into a deck.
///
/// Lines before the first slide indicator are ignored. If the prompt has no
/// indicator at all, the result is a single slide titled
/// [`FALLBACK_TITLE`] carrying the whole prompt as its only bullet.
pub fn split_prompt(prompt: &str) -> Deck {
    let normalized: String = prompt.nfc().collect();
    let mut deck = Deck::new();
    let mut current: Option<Slide> = None;

    for line in normalized.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_slide_indicator(line, current.is_some()) {
            if let Some(slide) = current.take() {
                deck.add_slide(slide);
            }
            current = Some(Slide::new(extract_title(line)));
        } else if let Some(slide) = current.as_mut() {
            if line.starts_with(BULLET_MARKERS) {
                let content = strip_bullet_marker(line);
                if !content.is_empty() {
                    slide.add_bullet(content);
                }
            } else {
                slide.add_bullet(line);
            }
        }
    }

    if let Some(slide) = current {
        deck.add_slide(slide);
    }

    if deck.is_empty() {
        log::debug!("No slide indicators in prompt, using a single fallback slide");
        deck.add_slide(Slide::new(FALLBACK_TITLE).with_bullet(normalized.as_str()));
    }

    deck
}

/// Whether a (trimmed) line opens a new slide.
fn is_slide_indicator(line: &str, slide_open: bool) -> bool {
    SLIDE_PREFIXES.iter().any(|p| line.starts_with(p))
        || (!slide_open && HEADING_PREFIXES.iter().any(|p| line.starts_with(p)))
}

/// Title text of an indicator line: the part after the first colon, with
/// leading numbering removed.
fn extract_title(line: &str) -> String {
    let title = match line.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => line,
    };
    title
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ' ')
        .trim()
        .to_string()
}

/// Content of a bullet line without its marker or numbering.
fn strip_bullet_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        BULLET_MARKERS.contains(&c) || c.is_ascii_digit() || c == '.' || c == ' '
    })
    .trim()
}
