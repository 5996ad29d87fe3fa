//! Paragraph extraction from `.docx` files.
//!
//! Reads `word/document.xml` for paragraphs and runs, and `word/styles.xml`
//! to turn style ids into style names. Only direct run formatting is seen:
//! bold inherited from a style reads as not bold.
//!
//! ```text
//! <w:p>
//!   <w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>
//!   <w:r><w:rPr><w:b/><w:sz w:val="32"/></w:rPr><w:t>Chapter 1</w:t></w:r>
//! </w:p>
//!
//! -> Paragraph { text: "Chapter 1", style: "heading 1", align: center,
//!                bold: 100%, size: 16pt }
//! ```
//!
//! Every `w:p` gets the next `original_index`, including empty ones, so
//! indices are stable but not dense. Paragraphs inside tables are read like
//! any other paragraph.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::{Alignment, Error, FormattingInfo, Paragraph, ParagraphSource, Result, RunFormat};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const FALLBACK_STYLE: &str = "normal";

/// An in-memory `.docx` document.
///
/// ```no_run
/// use parachunk::{DocxDocument, ParagraphSource};
///
/// let doc = DocxDocument::open("book.docx")?;
/// let paragraphs = doc.extract_paragraphs()?;
/// # Ok::<(), parachunk::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocxDocument {
    bytes: Vec<u8>,
}

impl DocxDocument {
    /// Read a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Wrap document bytes. Nothing is parsed until extraction.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ParagraphSource for DocxDocument {
    fn extract_paragraphs(&self) -> Result<Vec<Paragraph>> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;

        let styles = match read_part(&mut archive, STYLES_PART) {
            Ok(xml) => parse_styles(&xml)?,
            Err(Error::Zip(zip::result::ZipError::FileNotFound)) => StyleNames::default(),
            Err(e) => return Err(e),
        };
        let document = match read_part(&mut archive, DOCUMENT_PART) {
            Err(Error::Zip(zip::result::ZipError::FileNotFound)) => {
                return Err(Error::Extraction(format!(
                    "not a Word document: missing {DOCUMENT_PART}"
                )));
            }
            other => other?,
        };

        let paragraphs = parse_document(&document, &styles)?;
        tracing::debug!(paragraphs = paragraphs.len(), "extracted docx paragraphs");
        Ok(paragraphs)
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    let contents = contents
        .strip_prefix(&[0xEF, 0xBB, 0xBF])
        .unwrap_or(&contents)
        .to_vec();
    String::from_utf8(contents).map_err(|e| Error::Extraction(format!("{path}: {e}")))
}

/// Style id to lowercased style name.
#[derive(Debug, Default)]
struct StyleNames {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleNames {
    fn resolve(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self
                .names
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_lowercase()),
            None => self
                .default_paragraph
                .clone()
                .unwrap_or_else(|| FALLBACK_STYLE.to_string()),
        }
    }
}

fn parse_styles(xml: &str) -> Result<StyleNames> {
    let mut reader = Reader::from_str(xml);
    let mut styles = StyleNames::default();

    // (id, is default paragraph style)
    let mut current: Option<(String, bool)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if local_name(e.name().as_ref()) == b"style" => {
                let is_paragraph = attr(&e, b"type").as_deref() == Some("paragraph");
                let is_default = matches!(attr(&e, b"default").as_deref(), Some("1" | "true"));
                current = attr(&e, b"styleId").map(|id| (id, is_paragraph && is_default));
            }
            Event::Empty(e) if local_name(e.name().as_ref()) == b"name" => {
                if let (Some((id, is_default)), Some(name)) = (&current, attr(&e, b"val")) {
                    let name = name.to_lowercase();
                    if *is_default {
                        styles.default_paragraph = Some(name.clone());
                    }
                    styles.names.insert(id.clone(), name);
                }
            }
            Event::End(e) if local_name(e.name().as_ref()) == b"style" => current = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(styles)
}

/// Paragraph being read.
#[derive(Default)]
struct OpenParagraph {
    runs: Vec<RunFormat>,
    run: Option<RunFormat>,
    style_id: Option<String>,
    alignment: Alignment,
    in_run_props: bool,
    in_text: bool,
}

impl OpenParagraph {
    fn push_text(&mut self, text: &str) {
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn close_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.runs.push(run);
        }
    }

    fn finish(mut self, index: usize, styles: &StyleNames) -> Paragraph {
        self.close_run();
        let text: String = self.runs.iter().map(|r| r.text.as_str()).collect();
        let style = styles.resolve(self.style_id.as_deref());
        let formatting = FormattingInfo::from_runs(&self.runs, self.alignment, &style);
        Paragraph::new(index, &text, formatting)
    }
}

fn parse_document(xml: &str, styles: &StyleNames) -> Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut index = 0;
    let mut depth = 0usize;
    let mut open = OpenParagraph::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"p" => {
                        if depth == 0 {
                            open = OpenParagraph::default();
                        }
                        depth += 1;
                    }
                    b"r" if depth > 0 => {
                        open.close_run();
                        open.run = Some(RunFormat::default());
                    }
                    b"rPr" if open.run.is_some() => open.in_run_props = true,
                    b"t" if open.run.is_some() => open.in_text = true,
                    other => apply_property(&mut open, depth, other, &e),
                }
            }
            Event::Empty(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    // <w:p/> is an empty paragraph: it still takes an index
                    b"p" if depth == 0 => index += 1,
                    b"tab" => open.push_text("\t"),
                    b"br" | b"cr" => open.push_text("\n"),
                    other => apply_property(&mut open, depth, other, &e),
                }
            }
            Event::Text(e) if open.in_text => {
                open.push_text(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(e) if open.in_text => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    open.push_text(&resolved);
                }
            }
            Event::End(e) => match local_name(e.name().as_ref()) {
                b"t" => open.in_text = false,
                b"rPr" => open.in_run_props = false,
                b"r" => open.close_run(),
                b"p" if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        let paragraph = std::mem::take(&mut open).finish(index, styles);
                        index += 1;
                        if !paragraph.is_empty() {
                            paragraphs.push(paragraph);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs)
}

/// Run and paragraph properties.
fn apply_property(open: &mut OpenParagraph, depth: usize, name: &[u8], e: &BytesStart<'_>) {
    if open.in_run_props {
        if let Some(run) = open.run.as_mut() {
            match name {
                b"b" => run.bold = toggle(e),
                b"i" => run.italic = toggle(e),
                b"sz" => {
                    run.font_size = attr(e, b"val")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|half_points| half_points / 2.0);
                }
                _ => {}
            }
        }
        return;
    }

    // Properties of nested (text box) paragraphs do not describe the outer one
    if depth != 1 || open.run.is_some() {
        return;
    }
    match name {
        b"pStyle" => open.style_id = attr(e, b"val"),
        b"jc" => open.alignment = attr(e, b"val").map_or(Alignment::Left, |v| alignment(&v)),
        _ => {}
    }
}

fn alignment(val: &str) -> Alignment {
    match val {
        "center" => Alignment::Center,
        "right" | "end" => Alignment::Right,
        "both" | "distribute" | "lowKashida" | "mediumKashida" | "highKashida"
        | "thaiDistribute" => Alignment::Justify,
        _ => Alignment::Left,
    }
}

/// `<w:b/>` is on; `<w:b w:val="false"/>` (or 0, off, none) is off.
fn toggle(e: &BytesStart<'_>) -> bool {
    !matches!(
        attr(e, b"val").as_deref(),
        Some("false" | "0" | "off" | "none")
    )
}

/// Attribute value by local name.
fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

fn resolve_entity(entity: &str) -> Option<String> {
    let c = match entity {
        "apos" => '\'',
        "quot" => '"',
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(c.to_string())
}
