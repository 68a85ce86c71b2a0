//! Output types: rendered pages, conversion stats and the JSON shapes
//! exchanged at the service boundary.

use crate::config::LayoutSettings;
use crate::pipeline::encode::to_base64;
use crate::pipeline::render::PageLayout;
use serde::{Deserialize, Serialize};

/// One encoded page image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// 1-indexed page number.
    pub page_num: usize,
    /// `page-{n}.jpg` / `page-{n}.png`.
    pub file_name: String,
    pub mime_type: String,
    /// Encoded raster bytes.
    pub bytes: Vec<u8>,
    /// The line placements the image was painted from.
    pub layout: PageLayout,
}

/// Counters and timings for one image-mode conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Paragraphs in the source document, blank ones included.
    pub source_paragraphs: usize,
    /// Paragraphs that reached the wrapper.
    pub kept_paragraphs: usize,
    pub wrapped_lines: usize,
    pub total_pages: usize,
    pub lines_per_page: usize,
    pub encoded_bytes: usize,
    pub layout_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Result of an image-mode conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Pages in page order.
    pub pages: Vec<RenderedPage>,
    pub layout: LayoutSettings,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// The `{ "pages": [...] }` response body.
    pub fn to_pages_response(&self) -> PagesResponse {
        PagesResponse {
            pages: self.pages.iter().map(PageEntry::from).collect(),
        }
    }

    /// Consume the output into the response body, dropping raw buffers as
    /// they are encoded.
    pub fn into_pages_response(self) -> PagesResponse {
        PagesResponse {
            pages: self.pages.into_iter().map(|p| PageEntry::from(&p)).collect(),
        }
    }
}

/// Image-mode response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesResponse {
    pub pages: Vec<PageEntry>,
}

/// One page inside [`PagesResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    pub file_name: String,
    pub mime: String,
    pub base64: String,
}

impl From<&RenderedPage> for PageEntry {
    fn from(page: &RenderedPage) -> Self {
        Self {
            file_name: page.file_name.clone(),
            mime: page.mime_type.clone(),
            base64: to_base64(&page.bytes),
        }
    }
}

/// Text-mode response body: `{ "mode": "text", "text": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResponse {
    pub mode: String,
    pub text: String,
}

impl TextResponse {
    pub fn new(text: String) -> Self {
        Self {
            mode: "text".to_string(),
            text,
        }
    }
}

/// Error response body: `{ "error": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Either response body, serialised without a wrapper tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionResponse {
    Text(TextResponse),
    Pages(PagesResponse),
}
