//! Conversion entry points.
//!
//! A [`Converter`] owns the validated configuration and the process-wide
//! glyph painter, and exposes the two pipeline variants:
//!
//! ```text
//!                      ┌─▶ wrap ─▶ paginate ─▶ render ─▶ encode   (images)
//! bytes ─▶ parse ─▶ extract
//!                      └─▶ join "\n"                               (text)
//! ```
//!
//! Both variants share parsing and extraction and diverge right after. Each
//! has a blocking form, used by tests and by callers already on a worker
//! thread, and an async form that keeps the CPU work off the runtime's
//! worker threads via `spawn_blocking`. In the async image pipeline, pages
//! are rendered concurrently (`render_concurrency`) but returned in order.
//!
//! A failure anywhere aborts the whole conversion. There is no partial
//! result.

use crate::config::ConversionConfig;
use crate::docx::{self, Document};
use crate::error::DocPagesError;
use crate::font::{self, GlyphPainter};
use crate::output::{
    ConversionOutput, ConversionResponse, ConversionStats, RenderedPage, TextResponse,
};
use crate::pipeline::paginate::{paginate, Page};
use crate::pipeline::{extract, input, render, wrap};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Which pipeline variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Wrap, paginate and render page images.
    Images,
    /// Join paragraphs into flat text.
    Text,
}

/// Pages laid out but not yet rendered.
struct Paginated {
    pages: Vec<Page>,
    stats: ConversionStats,
}

/// Stateless document converter, shareable across requests.
#[derive(Clone)]
pub struct Converter {
    config: Arc<ConversionConfig>,
    font: Arc<dyn GlyphPainter>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("font", &self.font.describe())
            .finish()
    }
}

impl Converter {
    /// Use an already-loaded painter.
    pub fn new(config: ConversionConfig, font: Arc<dyn GlyphPainter>) -> Self {
        Self {
            config: Arc::new(config),
            font,
        }
    }

    /// Load the font named by `config` and build a converter.
    ///
    /// Call once at startup; a missing font is a
    /// [`DocPagesError::ResourceInit`].
    pub fn from_config(config: ConversionConfig) -> Result<Self, DocPagesError> {
        let font = font::load_font(&config)?;
        Ok(Self::new(config, font))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    // ── Pipeline variants over a parsed document ─────────────────────────

    /// Image variant: extract → wrap → paginate → render → encode.
    pub fn pages_from_document(&self, doc: Document) -> Result<ConversionOutput, DocPagesError> {
        let start = Instant::now();
        let paginated = self.paginate_document(doc);
        let total = paginated.pages.len();
        self.notify_start(total);

        let render_start = Instant::now();
        let pages = paginated
            .pages
            .iter()
            .map(|page| {
                let rendered = render::render_and_encode(page, &self.config, self.font.as_ref())?;
                self.notify_rendered(&rendered, total);
                Ok(rendered)
            })
            .collect::<Result<Vec<_>, DocPagesError>>()?;

        Ok(self.finish(pages, paginated.stats, render_start, start))
    }

    /// Text variant: extract → join.
    pub fn text_from_document(&self, doc: Document) -> String {
        extract::extract_text(doc)
    }

    // ── Blocking byte-level entry points ─────────────────────────────────

    /// Parse DOCX bytes and render every page.
    pub fn convert_pages_blocking(&self, bytes: &[u8]) -> Result<ConversionOutput, DocPagesError> {
        let doc = docx::parse(bytes)?;
        self.pages_from_document(doc)
    }

    /// Parse DOCX bytes and return the flat text.
    pub fn convert_text_blocking(&self, bytes: &[u8]) -> Result<String, DocPagesError> {
        text_from_bytes_blocking(bytes)
    }

    // ── Async entry points ───────────────────────────────────────────────

    /// Async image pipeline.
    ///
    /// Parsing and layout run in one `spawn_blocking` task; pages are then
    /// rendered as separate blocking tasks, `render_concurrency` at a time,
    /// and collected in page order.
    pub async fn convert_pages(&self, bytes: Vec<u8>) -> Result<ConversionOutput, DocPagesError> {
        let start = Instant::now();
        info!("Starting image conversion: {} bytes", bytes.len());

        let this = self.clone();
        let paginated = tokio::task::spawn_blocking(move || {
            let doc = docx::parse(&bytes)?;
            Ok::<_, DocPagesError>(this.paginate_document(doc))
        })
        .await
        .map_err(|e| DocPagesError::Internal(format!("Layout task panicked: {}", e)))??;

        let Paginated { pages, stats } = paginated;
        let total = pages.len();
        self.notify_start(total);

        let render_start = Instant::now();
        let rendered: Vec<RenderedPage> = stream::iter(pages.into_iter().map(|page| {
            let config = Arc::clone(&self.config);
            let font = Arc::clone(&self.font);
            async move {
                tokio::task::spawn_blocking(move || {
                    render::render_and_encode(&page, &config, font.as_ref())
                })
                .await
                .map_err(|e| DocPagesError::Internal(format!("Render task panicked: {}", e)))?
            }
        }))
        .buffered(self.config.render_concurrency)
        .inspect_ok(|page| self.notify_rendered(page, total))
        .try_collect()
        .await?;

        Ok(self.finish(rendered, stats, render_start, start))
    }

    /// Async text pipeline.
    pub async fn convert_text(&self, bytes: Vec<u8>) -> Result<String, DocPagesError> {
        text_from_bytes(bytes).await
    }

    /// Run either variant and return its response body.
    pub async fn run(
        &self,
        mode: ConversionMode,
        bytes: Vec<u8>,
    ) -> Result<ConversionResponse, DocPagesError> {
        match mode {
            ConversionMode::Images => {
                let output = self.convert_pages(bytes).await?;
                Ok(ConversionResponse::Pages(output.into_pages_response()))
            }
            ConversionMode::Text => {
                let text = self.convert_text(bytes).await?;
                Ok(ConversionResponse::Text(TextResponse::new(text)))
            }
        }
    }

    /// Resolve a path or URL, then run `mode`.
    pub async fn convert_input(
        &self,
        input_str: impl AsRef<str>,
        mode: ConversionMode,
    ) -> Result<ConversionResponse, DocPagesError> {
        let bytes =
            input::resolve_input(input_str.as_ref(), self.config.download_timeout_secs).await?;
        self.run(mode, bytes).await
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn paginate_document(&self, doc: Document) -> Paginated {
        let layout_start = Instant::now();
        let source_paragraphs = doc.len();

        let paragraphs = extract::extract_paragraphs(doc, self.config.keep_blank_paragraphs);
        let kept_paragraphs = paragraphs.len();

        let lines = wrap::wrap_paragraphs(paragraphs, self.config.wrap_width);
        let wrapped_lines = lines.len();

        let lines_per_page = self.config.lines_per_page();
        let pages = paginate(lines, lines_per_page);

        debug!(
            "Layout: {} paragraphs ({} kept) → {} lines → {} pages of ≤{}",
            source_paragraphs,
            kept_paragraphs,
            wrapped_lines,
            pages.len(),
            lines_per_page
        );

        let stats = ConversionStats {
            source_paragraphs,
            kept_paragraphs,
            wrapped_lines,
            total_pages: pages.len(),
            lines_per_page,
            layout_duration_ms: layout_start.elapsed().as_millis() as u64,
            ..ConversionStats::default()
        };
        Paginated { pages, stats }
    }

    fn finish(
        &self,
        pages: Vec<RenderedPage>,
        mut stats: ConversionStats,
        render_start: Instant,
        start: Instant,
    ) -> ConversionOutput {
        stats.render_duration_ms = render_start.elapsed().as_millis() as u64;
        stats.encoded_bytes = pages.iter().map(|p| p.bytes.len()).sum();
        stats.total_duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Conversion complete: {} pages, {} bytes, {}ms total",
            pages.len(),
            stats.encoded_bytes,
            stats.total_duration_ms
        );

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_complete(pages.len());
        }

        ConversionOutput {
            pages,
            layout: self.config.layout(),
            stats,
        }
    }

    fn notify_start(&self, total: usize) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_conversion_start(total);
        }
    }

    fn notify_rendered(&self, page: &RenderedPage, total: usize) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_page_rendered(page.page_num, total, page.bytes.len());
        }
    }
}

/// Parse DOCX bytes and return the flat text.
///
/// Text mode draws nothing, so unlike [`Converter`] this needs no font.
pub fn text_from_bytes_blocking(bytes: &[u8]) -> Result<String, DocPagesError> {
    let doc = docx::parse(bytes)?;
    Ok(extract::extract_text(doc))
}

/// Async text pipeline: [`text_from_bytes_blocking`] on the blocking pool.
pub async fn text_from_bytes(bytes: Vec<u8>) -> Result<String, DocPagesError> {
    info!("Starting text conversion: {} bytes", bytes.len());
    tokio::task::spawn_blocking(move || text_from_bytes_blocking(&bytes))
        .await
        .map_err(|e| DocPagesError::Internal(format!("Text task panicked: {}", e)))?
}

/// Write every page as `dir/page-N.ext`.
///
/// Each file is written to a temporary name and renamed into place, so a
/// reader never sees a half-written page.
pub async fn write_pages(
    output: &ConversionOutput,
    dir: impl AsRef<Path>,
) -> Result<Vec<std::path::PathBuf>, DocPagesError> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| DocPagesError::OutputWriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    let mut written = Vec::with_capacity(output.pages.len());
    for page in &output.pages {
        let path = dir.join(&page.file_name);
        let tmp_path = dir.join(format!(".{}.tmp", page.file_name));

        tokio::fs::write(&tmp_path, &page.bytes)
            .await
            .map_err(|e| DocPagesError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| DocPagesError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        written.push(path);
    }
    Ok(written)
}
