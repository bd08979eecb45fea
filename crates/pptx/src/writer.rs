//! PPTX package writer.

use crate::parts::{self, ct, rel, NS_A, NS_P, NS_R, XML_DECL};
use chrono::{DateTime, Utc};
use deckgen_core::{Deck, Error, Result, Slide};
use quick_xml::escape::escape;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default name of a generated deck file.
pub const DEFAULT_DECK_FILENAME: &str = "GeneratedDeck.pptx";

/// Writer that renders a [`Deck`] as a PowerPoint package, one
/// "Title and Content" slide per deck slide.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    /// Recorded as the document creator.
    creator: String,

    /// Creation time; the current time when unset.
    timestamp: Option<DateTime<Utc>>,
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self {
            creator: "deckgen".to_string(),
            timestamp: None,
        }
    }
}

impl PptxWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the creator recorded in the document properties.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    /// Pin the creation time recorded in the document properties.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Render a deck to an in-memory package.
    pub fn write(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(deck, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Render a deck to a file.
    pub fn save(&self, deck: &Deck, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_to(deck, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Render a deck into any seekable sink.
    pub fn write_to<W: Write + Seek>(&self, deck: &Deck, sink: W) -> Result<()> {
        let parts = self.package_parts(deck)?;
        let mut zip = ZipWriter::new(sink);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in &parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;

        log::debug!(
            "Wrote PPTX package with {} slides ({} parts)",
            deck.len(),
            parts.len()
        );
        Ok(())
    }

    /// All package parts as `(entry name, XML)` in archive order.
    ///
    /// `[Content_Types].xml` comes first, as some consumers expect.
    pub fn package_parts(&self, deck: &Deck) -> Result<Vec<(String, String)>> {
        if deck.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let count = deck.len();
        let mut parts = Vec::with_capacity(12 + count * 2);

        parts.push(("[Content_Types].xml".to_string(), content_types(count)));
        parts.push(("_rels/.rels".to_string(), parts::root_rels()));
        parts.push(("docProps/core.xml".to_string(), self.core_properties(deck)));
        parts.push(("docProps/app.xml".to_string(), app_properties(count)));
        parts.push(("ppt/presentation.xml".to_string(), presentation(count)));
        parts.push((
            "ppt/_rels/presentation.xml.rels".to_string(),
            presentation_rels(count),
        ));
        parts.push(("ppt/presProps.xml".to_string(), parts::pres_props()));
        parts.push(("ppt/viewProps.xml".to_string(), parts::view_props()));
        parts.push(("ppt/tableStyles.xml".to_string(), parts::table_styles()));
        parts.push(("ppt/theme/theme1.xml".to_string(), parts::theme()));
        parts.push((
            "ppt/slideMasters/slideMaster1.xml".to_string(),
            parts::slide_master(),
        ));
        parts.push((
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
            parts::slide_master_rels(),
        ));
        parts.push((
            "ppt/slideLayouts/slideLayout1.xml".to_string(),
            parts::slide_layout(),
        ));
        parts.push((
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
            parts::slide_layout_rels(),
        ));

        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            parts.push((parts::slide_part_name(number), slide_xml(slide)));
            parts.push((parts::slide_rels_part_name(number), parts::slide_rels()));
        }

        Ok(parts)
    }

    fn core_properties(&self, deck: &Deck) -> String {
        let timestamp = self
            .timestamp
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        let title = text_content(deck.title().unwrap_or_default());
        let creator = text_content(&self.creator);

        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECL);
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        xml.push_str(&format!("<dc:title>{}</dc:title>", title));
        xml.push_str(&format!("<dc:creator>{}</dc:creator>", creator));
        xml.push_str(&format!(
            "<cp:lastModifiedBy>{}</cp:lastModifiedBy>",
            creator
        ));
        xml.push_str("<cp:revision>1</cp:revision>");
        xml.push_str(&format!(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
            timestamp
        ));
        xml.push_str(&format!(
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
            timestamp
        ));
        xml.push_str("</cp:coreProperties>");
        xml
    }
}

fn content_types(slide_count: usize) -> String {
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        ct::RELS
    ));
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut overrides = vec![
        ("/ppt/presentation.xml".to_string(), ct::PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), ct::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), ct::SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml".to_string(), ct::THEME),
        ("/ppt/presProps.xml".to_string(), ct::PRES_PROPS),
        ("/ppt/viewProps.xml".to_string(), ct::VIEW_PROPS),
        ("/ppt/tableStyles.xml".to_string(), ct::TABLE_STYLES),
        ("/docProps/core.xml".to_string(), ct::CORE_PROPERTIES),
        ("/docProps/app.xml".to_string(), ct::EXTENDED_PROPERTIES),
    ];
    for number in 1..=slide_count {
        overrides.push((format!("/{}", parts::slide_part_name(number)), ct::SLIDE));
    }

    for (part_name, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part_name, content_type
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn app_properties(slide_count: usize) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
        r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    xml.push_str("<Application>deckgen</Application>");
    xml.push_str("<PresentationFormat>On-screen Show (4:3)</PresentationFormat>");
    xml.push_str(&format!("<Slides>{}</Slides>", slide_count));
    xml.push_str("</Properties>");
    xml
}

fn presentation(slide_count: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    xml.push_str("<p:sldIdLst>");
    for idx in 0..slide_count {
        xml.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            parts::FIRST_SLIDE_ID as usize + idx,
            parts::FIRST_SLIDE_REL_ID + idx
        ));
    }
    xml.push_str("</p:sldIdLst>");

    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
        parts::SLIDE_WIDTH,
        parts::SLIDE_HEIGHT
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels(slide_count: usize) -> String {
    let mut entries = vec![
        (
            "rId1".to_string(),
            rel::SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), rel::THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), rel::PRES_PROPS, "presProps.xml".to_string()),
        ("rId4".to_string(), rel::VIEW_PROPS, "viewProps.xml".to_string()),
        (
            "rId5".to_string(),
            rel::TABLE_STYLES,
            "tableStyles.xml".to_string(),
        ),
    ];
    for idx in 0..slide_count {
        entries.push((
            format!("rId{}", parts::FIRST_SLIDE_REL_ID + idx),
            rel::SLIDE,
            format!("slides/slide{}.xml", idx + 1),
        ));
    }
    parts::relationships(&entries)
}

/// Slide part: a title placeholder and a body placeholder with one level-0
/// paragraph per bullet.
fn slide_xml(slide: &Slide) -> String {
    let mut xml = String::with_capacity(1024 + slide.bullets.len() * 96);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_A, NS_R, NS_P
    ));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(parts::GROUP_SHAPE_PROPS);

    // Title placeholder
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>"#,
        r#"<p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>"#
    ));
    write_paragraph(&mut xml, &slide.title, false);
    xml.push_str("</p:txBody></p:sp>");

    // Body placeholder
    xml.push_str(concat!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/>"#,
        r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>"#,
        r#"<p:spPr/><p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>"#
    ));
    if slide.bullets.is_empty() {
        write_paragraph(&mut xml, "", true);
    }
    for bullet in &slide.bullets {
        write_paragraph(&mut xml, bullet, true);
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// One `<a:p>`; embedded newlines become line breaks within the paragraph.
fn write_paragraph(xml: &mut String, text: &str, bullet: bool) {
    xml.push_str("<a:p>");
    if bullet {
        xml.push_str(r#"<a:pPr lvl="0"/>"#);
    }

    let text = text.replace("\r\n", "\n");
    if text.is_empty() {
        xml.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/>"#);
    } else {
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                xml.push_str(r#"<a:br><a:rPr lang="en-US" dirty="0"/></a:br>"#);
            }
            if !line.is_empty() {
                xml.push_str(r#"<a:r><a:rPr lang="en-US" dirty="0"/><a:t>"#);
                xml.push_str(&text_content(line));
                xml.push_str("</a:t></a:r>");
            }
        }
    }

    xml.push_str("</a:p>");
}

/// Escape text for element content, dropping characters XML 1.0 forbids.
fn text_content(text: &str) -> String {
    let allowed: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}'))
        .collect();
    escape(&allowed).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample_deck() -> Deck {
        Deck::from(vec![
            Slide::new("Why Rust")
                .with_bullet("Memory safety")
                .with_bullet("Speed & <control>"),
            Slide::new("Summary"),
        ])
    }

    #[test]
    fn test_empty_deck_rejected() {
        let result = PptxWriter::new().write(&Deck::new());
        assert!(matches!(result, Err(Error::EmptyDeck)));
    }

    #[test]
    fn test_package_parts_listing() {
        let parts = PptxWriter::new().package_parts(&sample_deck()).unwrap();
        let names: Vec<&str> = parts.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(names[0], "[Content_Types].xml");
        assert!(names.contains(&"ppt/slides/slide1.xml"));
        assert!(names.contains(&"ppt/slides/slide2.xml"));
        assert!(names.contains(&"ppt/slides/_rels/slide2.xml.rels"));
        assert!(!names.contains(&"ppt/slides/slide3.xml"));
    }

    #[test]
    fn test_content_types_override_every_slide() {
        let xml = content_types(3);
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide3.xml""#));
        assert_eq!(xml.matches(ct::SLIDE).count(), 3);
    }

    #[test]
    fn test_presentation_slide_ids() {
        let xml = presentation(2);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId7"/>"#));

        let rels = presentation_rels(2);
        assert!(rels.contains(r#"Id="rId7""#));
        assert!(rels.contains(r#"Target="slides/slide2.xml""#));
    }

    #[test]
    fn test_slide_xml_escapes_text() {
        let xml = slide_xml(&sample_deck().slides[0]);
        assert!(xml.contains("<a:t>Why Rust</a:t>"));
        assert!(xml.contains("<a:t>Speed &amp; &lt;control&gt;</a:t>"));
        assert_eq!(xml.matches(r#"<a:pPr lvl="0"/>"#).count(), 2);
    }

    #[test]
    fn test_slide_without_bullets_has_empty_body_paragraph() {
        let xml = slide_xml(&Slide::new("Summary"));
        assert!(xml.contains(r#"<a:p><a:pPr lvl="0"/><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let mut xml = String::new();
        write_paragraph(&mut xml, "one\ntwo", true);
        assert!(xml.contains("<a:t>one</a:t></a:r><a:br>"));
        assert!(xml.contains("<a:t>two</a:t>"));
    }

    #[test]
    fn test_text_content_drops_control_chars() {
        assert_eq!(text_content("a\u{0}b\u{7}c"), "abc");
        assert_eq!(text_content("tab\there"), "tab\there");
    }

    #[test]
    fn test_core_properties_use_pinned_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let writer = PptxWriter::new().with_creator("tests").with_timestamp(ts);
        let xml = writer.core_properties(&sample_deck());

        assert!(xml.contains("<dc:title>Why Rust</dc:title>"));
        assert!(xml.contains("<dc:creator>tests</dc:creator>"));
        assert!(xml.contains(">2024-05-01T12:30:00Z</dcterms:created>"));
    }

    #[test]
    fn test_write_produces_zip_archive() {
        let bytes = PptxWriter::new().write(&sample_deck()).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut slide = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut slide)
            .unwrap();
        assert!(slide.contains("<a:t>Summary</a:t>"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DECK_FILENAME);
        PptxWriter::new().save(&sample_deck(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.len() > 1000);
        assert!(bytes.starts_with(b"PK"));
    }
}
