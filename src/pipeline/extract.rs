//! Text extraction: a parsed [`Document`] → the paragraphs worth laying out.
//!
//! Blank paragraphs (empty or whitespace-only) carry no text. They are
//! dropped unless the caller asks to keep them as vertical spacing in image
//! mode. Kept paragraphs are passed through untouched, including their
//! leading, trailing and internal whitespace.

use crate::docx::Document;

/// True for paragraphs with no visible characters.
pub fn is_blank(paragraph: &str) -> bool {
    paragraph.trim().is_empty()
}

/// Ordered paragraphs for the image pipeline.
pub fn extract_paragraphs(doc: Document, keep_blank: bool) -> Vec<String> {
    let paragraphs = doc.into_paragraphs();
    if keep_blank {
        return paragraphs;
    }
    paragraphs.into_iter().filter(|p| !is_blank(p)).collect()
}

/// Flat text: every non-blank paragraph, joined by a single `\n`.
pub fn extract_text(doc: Document) -> String {
    extract_paragraphs(doc, false).join("\n")
}
