//! Slide XML: the documents exchanged between slide sources and the renderer.
//!
//! Two shapes are accepted. The model answers with a single slide:
//!
//! ```xml
//! <slide>
//!   <title>Why Rust</title>
//!   <bullet>Memory safety</bullet>
//! </slide>
//! ```
//!
//! and uploads and the heuristic splitter use a presentation of slides:
//!
//! ```xml
//! <presentation>
//!   <slide>
//!     <title>Why Rust</title>
//!     <content><point>Memory safety</point></content>
//!   </slide>
//! </presentation>
//! ```

use crate::error::{Error, Result};
use crate::types::{Deck, Slide};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

/// Schema guardrail appended to every model prompt.
pub const SCHEMA_INSTRUCTION: &str = "Output ONLY valid XML in this exact schema (no comments, no prose, no extra tags!):\n\
<slide>\n\
\x20 <title>…</title>\n\
\x20 <bullet>…</bullet>\n\
\x20 <bullet>…</bullet>\n\
\x20 <bullet>…</bullet>\n\
\x20 <bullet>…</bullet>\n\
</slide>";

/// First `<slide>…</slide>` span in free-form model output.
static SLIDE_FRAGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<slide(?:\s[^>]*)?>.*?</slide>").unwrap());

/// Slide bodies for the lenient parser.
static SLIDE_BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<slide(?:\s[^>]*)?>(.*?)</slide>").unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").unwrap());

static BULLET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(?:bullet|point)>(.*?)</(?:bullet|point)>").unwrap());

/// Extract the first `<slide>…</slide>` element from raw model output.
pub fn extract_slide_fragment(raw: &str) -> Result<&str> {
    SLIDE_FRAGMENT_REGEX
        .find(raw)
        .map(|m| m.as_str())
        .ok_or(Error::MissingSlide)
}

/// Parse slide XML into a deck.
///
/// A strict XML pass runs first. If it fails, a lenient pattern-based pass
/// recovers titles and bullets from the raw text; it succeeds only when
/// every slide has a title and at least one bullet.
pub fn parse_deck(xml: &str) -> Result<Deck> {
    match parse_strict(xml) {
        Ok(deck) => Ok(deck),
        Err(strict_err) => {
            log::warn!("Strict slide XML parse failed ({}), trying lenient parse", strict_err);
            parse_lenient(xml).ok_or(Error::MalformedXml(strict_err))
        }
    }
}

/// Serialize a deck as a presentation document.
pub fn write_deck(deck: &Deck) -> String {
    let mut xml = String::with_capacity(128 + deck.bullet_count() * 48);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<presentation>\n");

    for slide in &deck.slides {
        xml.push_str("    <slide>\n");
        xml.push_str(&format!("        <title>{}</title>\n", escape(&slide.title)));
        xml.push_str("        <content>\n");
        for bullet in &slide.bullets {
            xml.push_str(&format!("            <point>{}</point>\n", escape(bullet)));
        }
        xml.push_str("        </content>\n");
        xml.push_str("    </slide>\n");
    }

    xml.push_str("</presentation>\n");
    xml
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Bullet,
}

#[derive(Debug, Default)]
struct PendingSlide {
    title: Option<String>,
    bullets: Vec<String>,
}

impl PendingSlide {
    fn finish(self, number: usize) -> std::result::Result<Slide, String> {
        let title = self
            .title
            .ok_or_else(|| format!("slide {} has no <title>", number))?;
        Ok(Slide {
            title,
            bullets: self.bullets,
        })
    }
}

fn parse_strict(xml: &str) -> std::result::Result<Deck, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut deck = Deck::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut slide: Option<PendingSlide> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                match name.as_slice() {
                    b"slide" => {
                        if slide.is_some() {
                            return Err("nested <slide> element".to_string());
                        }
                        slide = Some(PendingSlide::default());
                    }
                    b"title" if slide.is_some() && field.is_none() => {
                        field = Some(Field::Title);
                        text.clear();
                    }
                    b"bullet" | b"point" if slide.is_some() && field.is_none() => {
                        field = Some(Field::Bullet);
                        text.clear();
                    }
                    _ => {}
                }
                open.push(name);
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"slide" => {
                    return Err(format!("slide {} has no <title>", deck.len() + 1));
                }
                b"title" => {
                    if let Some(pending) = slide.as_mut() {
                        pending.title.get_or_insert_with(String::new);
                    }
                }
                b"bullet" | b"point" => {
                    if let Some(pending) = slide.as_mut() {
                        pending.bullets.push(String::new());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if field.is_some() {
                    let decoded = e.unescape().map_err(|e| e.to_string())?;
                    text.push_str(&decoded);
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                match open.pop() {
                    Some(start) if start.as_slice() == name.as_ref() => {}
                    Some(start) => {
                        return Err(format!(
                            "</{}> does not close <{}>",
                            String::from_utf8_lossy(name.as_ref()),
                            String::from_utf8_lossy(&start)
                        ));
                    }
                    None => {
                        return Err(format!(
                            "unexpected </{}>",
                            String::from_utf8_lossy(name.as_ref())
                        ));
                    }
                }

                match name.as_ref() {
                    b"title" if field == Some(Field::Title) => {
                        if let Some(pending) = slide.as_mut() {
                            // The first title of a slide wins.
                            if pending.title.is_none() {
                                pending.title = Some(text.trim().to_string());
                            }
                        }
                        field = None;
                    }
                    b"bullet" | b"point" if field == Some(Field::Bullet) => {
                        if let Some(pending) = slide.as_mut() {
                            pending.bullets.push(text.trim().to_string());
                        }
                        field = None;
                    }
                    b"slide" => {
                        if let Some(pending) = slide.take() {
                            deck.add_slide(pending.finish(deck.len() + 1)?);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
    }

    if let Some(start) = open.last() {
        return Err(format!("unclosed <{}>", String::from_utf8_lossy(start)));
    }
    if deck.is_empty() {
        return Err("no <slide> element found".to_string());
    }

    Ok(deck)
}

fn parse_lenient(xml: &str) -> Option<Deck> {
    let mut bodies: Vec<&str> = SLIDE_BODY_REGEX
        .captures_iter(xml)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    if bodies.is_empty() {
        bodies.push(xml);
    }

    let mut deck = Deck::new();
    for body in bodies {
        let title = TITLE_REGEX.captures(body)?.get(1)?.as_str();
        let bullets: Vec<String> = BULLET_REGEX
            .captures_iter(body)
            .filter_map(|c| c.get(1).map(|m| lenient_text(m.as_str())))
            .collect();
        if bullets.is_empty() {
            return None;
        }
        deck.add_slide(Slide {
            title: lenient_text(title),
            bullets,
        });
    }

    Some(deck)
}

/// Trim and decode entities where possible, keeping the raw text otherwise.
fn lenient_text(raw: &str) -> String {
    let raw = raw.trim();
    match unescape(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}
