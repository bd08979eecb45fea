//! PPTX outline reader: recovers slide titles and bullets from a package.

use deckgen_core::{Deck, Error, Result, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Reader for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Copy)]
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Read the outline of a PPTX package.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = Deck::new();

        // Get the slide order from presentation.xml.rels
        let slide_order = self.get_slide_order(&mut archive)?;

        for slide_path in &slide_order {
            let slide = self.parse_slide(&mut archive, slide_path)?;
            deck.add_slide(slide);
        }

        log::debug!("Read {} slides from PPTX package", deck.len());
        Ok(deck)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_path = "ppt/_rels/presentation.xml.rels";

        let rels_content = self.read_file_from_archive(archive, rels_path)?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let rel_type = attribute(e, b"Type").unwrap_or_default();
                    let target = attribute(e, b"Target").unwrap_or_default();
                    let id = attribute(e, b"Id").unwrap_or_default();

                    if is_slide_relationship(&rel_type) {
                        let order_num =
                            extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        // Sort slides by their number
        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut shapes = self.extract_shapes_from_xml(&content);

        // Top-to-bottom, then left-to-right; ties keep document order.
        shapes.sort_by(|a, b| {
            a.y.partial_cmp(&b.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        Ok(assemble_slide(shapes))
    }

    /// Extract text shapes with placeholder kind and position from slide XML.
    fn extract_shapes_from_xml(&self, xml_content: &str) -> Vec<ShapeInfo> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(false);

        let mut current_shape: Option<ShapeInfo> = None;
        let mut in_text_body = false;
        let mut in_run_text = false;
        let mut paragraph: Option<String> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" => current_shape = Some(ShapeInfo::default()),
                    b"txBody" => in_text_body = true,
                    b"p" if in_text_body => paragraph = Some(String::new()),
                    b"t" if paragraph.is_some() => in_run_text = true,
                    b"off" => read_offset(e, current_shape.as_mut()),
                    b"ph" => read_placeholder(e, current_shape.as_mut()),
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                    b"off" => read_offset(e, current_shape.as_mut()),
                    b"ph" => read_placeholder(e, current_shape.as_mut()),
                    b"br" => {
                        if let Some(text) = paragraph.as_mut() {
                            text.push('\n');
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_run_text {
                        if let Some(text) = paragraph.as_mut() {
                            text.push_str(&e.unescape().unwrap_or_default());
                        }
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"t" => in_run_text = false,
                    b"br" => {
                        if let Some(text) = paragraph.as_mut() {
                            text.push('\n');
                        }
                    }
                    b"p" => {
                        if let (Some(text), Some(shape)) = (paragraph.take(), current_shape.as_mut()) {
                            let text = text.trim().to_string();
                            if !text.is_empty() {
                                shape.paragraphs.push(text);
                            }
                        }
                    }
                    b"txBody" => in_text_body = false,
                    b"sp" => {
                        if let Some(shape) = current_shape.take() {
                            if !shape.paragraphs.is_empty() || shape.is_title() {
                                shapes.push(shape);
                            }
                        }
                        in_text_body = false;
                        in_run_text = false;
                        paragraph = None;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("XML parsing error, keeping shapes read so far: {}", e);
                    break;
                }
                _ => {}
            }
        }

        shapes
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a text shape extracted from slide XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    placeholder: Option<String>,
    paragraphs: Vec<String>,
    x: f64,
    y: f64,
}

impl ShapeInfo {
    fn is_title(&self) -> bool {
        matches!(self.placeholder.as_deref(), Some("title") | Some("ctrTitle"))
    }
}

/// Turn a slide's shapes into a title and bullets.
///
/// The title comes from the title placeholder, or failing that from the
/// first paragraph of the first shape. All other paragraphs are bullets.
fn assemble_slide(shapes: Vec<ShapeInfo>) -> Slide {
    let title_idx = shapes.iter().position(ShapeInfo::is_title);
    let mut slide = Slide::default();
    let mut title_taken = false;

    for (idx, shape) in shapes.into_iter().enumerate() {
        if Some(idx) == title_idx {
            slide.title = shape.paragraphs.join("\n");
            title_taken = true;
            continue;
        }

        let mut paragraphs = shape.paragraphs.into_iter();
        if title_idx.is_none() && !title_taken {
            if let Some(first) = paragraphs.next() {
                slide.title = first;
                title_taken = true;
            }
        }
        slide.bullets.extend(paragraphs);
    }

    slide
}

fn is_slide_relationship(rel_type: &str) -> bool {
    rel_type.ends_with("/slide")
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Record an `<a:off x=".." y=".."/>` position on the current shape.
fn read_offset(e: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    if let Some(shape) = shape {
        if let Some(x) = attribute(e, b"x").and_then(|v| v.parse::<f64>().ok()) {
            shape.x = x;
        }
        if let Some(y) = attribute(e, b"y").and_then(|v| v.parse::<f64>().ok()) {
            shape.y = y;
        }
    }
}

/// Record the placeholder type; a placeholder without one is a body.
fn read_placeholder(e: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    if let Some(shape) = shape {
        shape.placeholder = Some(attribute(e, b"type").unwrap_or_else(|| "body".to_string()));
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let stem = s.trim_end_matches(".rels").trim_end_matches(".xml");
    // Trailing digits are ASCII, so the char count is also the byte count.
    let start = stem.len() - stem.chars().rev().take_while(char::is_ascii_digit).count();
    stem[start..].parse().ok()
}
