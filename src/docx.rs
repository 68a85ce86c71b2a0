//! DOCX parsing: raw bytes → ordered paragraph strings.
//!
//! A DOCX file is a ZIP container whose main part, `word/document.xml`,
//! holds the body as WordprocessingML. Only what the layout engine needs is
//! read: the text of each top-level paragraph (`w:body/w:p`), in document
//! order. Formatting, tables, headers, footers and text boxes are ignored.
//!
//! Run content maps to text the way word processors flatten it:
//!
//! | Element | Text |
//! |---------|------|
//! | `w:t` | its characters |
//! | `w:tab` | `\t` |
//! | `w:br`, `w:cr` | `\n` |
//! | `w:noBreakHyphen` | `-` |

use crate::error::DocPagesError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Local file header signature every ZIP container starts with.
pub const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

/// Path of the main document part inside the container.
pub const MAIN_PART: &str = "word/document.xml";

/// A parsed document: nothing but its paragraphs, in source order.
///
/// Paragraphs may be empty or whitespace-only; filtering is the
/// extractor's job ([`crate::pipeline::extract`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    paragraphs: Vec<String>,
}

impl Document {
    /// Build a document from already-segmented paragraphs.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    pub fn into_paragraphs(self) -> Vec<String> {
        self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// True if `bytes` start with a ZIP local file header.
pub fn has_zip_magic(bytes: &[u8]) -> bool {
    bytes.len() >= ZIP_MAGIC.len() && &bytes[..ZIP_MAGIC.len()] == ZIP_MAGIC
}

/// Parse DOCX bytes into a [`Document`].
///
/// # Errors
/// [`DocPagesError::DocumentParse`] when the bytes are not a ZIP container,
/// the container has no `word/document.xml`, or that part is not
/// well-formed XML.
pub fn parse(bytes: &[u8]) -> Result<Document, DocPagesError> {
    if !has_zip_magic(bytes) {
        let head = &bytes[..bytes.len().min(4)];
        return Err(DocPagesError::parse(format!(
            "not a ZIP container (first bytes {head:?})"
        )));
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocPagesError::parse(format!("unreadable archive: {e}")))?;

    let mut xml = String::new();
    {
        let mut part = archive.by_name(MAIN_PART).map_err(|e| match e {
            ZipError::FileNotFound => DocPagesError::parse(format!("missing {MAIN_PART}")),
            other => DocPagesError::parse(format!("cannot open {MAIN_PART}: {other}")),
        })?;
        part.read_to_string(&mut xml)
            .map_err(|e| DocPagesError::parse(format!("cannot read {MAIN_PART}: {e}")))?;
    }

    let doc = parse_document_xml(&xml)?;
    debug!("Parsed {} paragraphs from {}", doc.len(), MAIN_PART);
    Ok(doc)
}

/// Extract top-level paragraph text from WordprocessingML.
pub fn parse_document_xml(xml: &str) -> Result<Document, DocPagesError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    // Local names of the currently open elements.
    let mut path: Vec<Vec<u8>> = Vec::new();
    // Number of open `p` elements; text only counts at depth 1.
    let mut p_depth = 0usize;
    let mut current: Option<String> = None;
    let mut saw_body = false;
    let mut paragraphs = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            DocPagesError::parse(format!(
                "malformed {MAIN_PART} at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"body" => saw_body = true,
                    b"p" => {
                        if p_depth == 0 && parent_is(&path, b"body") {
                            current = Some(String::new());
                        }
                        p_depth += 1;
                    }
                    special if p_depth == 1 && parent_is(&path, b"r") => {
                        if let (Some(text), Some(ch)) = (current.as_mut(), run_char(special)) {
                            text.push(ch);
                        }
                    }
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"body" => saw_body = true,
                    b"p" if p_depth == 0 && parent_is(&path, b"body") => {
                        paragraphs.push(String::new());
                    }
                    special if p_depth == 1 && parent_is(&path, b"r") => {
                        if let (Some(text), Some(ch)) = (current.as_mut(), run_char(special)) {
                            text.push(ch);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some(b"p".as_slice()) {
                    p_depth = p_depth.saturating_sub(1);
                    if p_depth == 0 {
                        if let Some(text) = current.take() {
                            paragraphs.push(text);
                        }
                    }
                }
            }
            Event::Text(t) => {
                if p_depth == 1 && parent_is(&path, b"t") {
                    if let Some(text) = current.as_mut() {
                        let unescaped = t.unescape().map_err(|e| {
                            DocPagesError::parse(format!("bad text in {MAIN_PART}: {e}"))
                        })?;
                        text.push_str(&unescaped);
                    }
                }
            }
            Event::CData(c) => {
                if p_depth == 1 && parent_is(&path, b"t") {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Event::Eof => {
                if let Some(open) = path.last() {
                    return Err(DocPagesError::parse(format!(
                        "{MAIN_PART} ends with unclosed <{}>",
                        String::from_utf8_lossy(open)
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_body {
        return Err(DocPagesError::parse(format!("{MAIN_PART} has no w:body")));
    }

    Ok(Document { paragraphs })
}

fn parent_is(path: &[Vec<u8>], local: &[u8]) -> bool {
    path.last().map(|n| n.as_slice() == local).unwrap_or(false)
}

/// Character produced by a run-content element such as `w:tab`.
fn run_char(local: &[u8]) -> Option<char> {
    match local {
        b"tab" => Some('\t'),
        b"br" | b"cr" => Some('\n'),
        b"noBreakHyphen" => Some('-'),
        _ => None,
    }
}
