//! Configuration types for document pagination and rendering.
//!
//! All layout behaviour is controlled through [`ConversionConfig`], built via
//! its [`ConversionConfigBuilder`]. The paginator's page capacity is not a
//! knob of its own: it is derived from the canvas height, the padding and
//! the line spacing ([`ConversionConfig::lines_per_page`]) so the renderer
//! and the paginator can never disagree about how much text fits a page.
//!
//! `build()` rejects any combination that would leave room for zero lines,
//! so a bad configuration surfaces at startup rather than mid-request.

use crate::error::DocPagesError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for a document conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use docx_pages::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .wrap_width(72)
///     .line_spacing(50)
///     .build()
///     .unwrap();
/// assert_eq!(config.lines_per_page(), 40);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum characters per wrapped line. Default: 60.
    ///
    /// Counted in Unicode scalar values, not measured glyph width.
    pub wrap_width: usize,

    /// Canvas width in pixels. Default: 1600.
    pub page_width: u32,

    /// Canvas height in pixels. Default: 2200.
    pub page_height: u32,

    /// Horizontal offset of every line. Default: 80.
    pub left_pad: u32,

    /// Vertical offset of the first line, and the bottom margin used when
    /// computing page capacity. Default: 80.
    pub top_pad: u32,

    /// Distance between consecutive baselines' top edges. Default: 60.
    pub line_spacing: u32,

    /// Glyph height in pixels. Default: 36.
    pub font_size: f32,

    /// TrueType/OpenType font file. If None, well-known system locations
    /// are tried by [`crate::font::load_font`].
    pub font_path: Option<PathBuf>,

    /// Raster format for rendered pages. Default: JPEG.
    pub image_format: ImageFormat,

    /// JPEG quality (1–100). Ignored for PNG. Default: 85.
    pub jpeg_quality: u8,

    /// Keep empty and whitespace-only paragraphs as blank lines in image
    /// mode. Default: false.
    ///
    /// Text mode always drops them.
    pub keep_blank_paragraphs: bool,

    /// Number of pages rendered concurrently on the blocking pool by the
    /// async entry points. Default: 4.
    pub render_concurrency: usize,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            wrap_width: 60,
            page_width: 1600,
            page_height: 2200,
            left_pad: 80,
            top_pad: 80,
            line_spacing: 60,
            font_size: 36.0,
            font_path: None,
            image_format: ImageFormat::default(),
            jpeg_quality: 85,
            keep_blank_paragraphs: false,
            render_concurrency: 4,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("wrap_width", &self.wrap_width)
            .field("page_width", &self.page_width)
            .field("page_height", &self.page_height)
            .field("left_pad", &self.left_pad)
            .field("top_pad", &self.top_pad)
            .field("line_spacing", &self.line_spacing)
            .field("font_size", &self.font_size)
            .field("font_path", &self.font_path)
            .field("image_format", &self.image_format)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("keep_blank_paragraphs", &self.keep_blank_paragraphs)
            .field("render_concurrency", &self.render_concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Page capacity `L = floor((page_height - 2 * top_pad) / line_spacing)`.
    ///
    /// Returns 0 for degenerate settings; `build()` never lets those through.
    pub fn lines_per_page(&self) -> usize {
        if self.line_spacing == 0 {
            return 0;
        }
        let usable = self.page_height.saturating_sub(self.top_pad.saturating_mul(2));
        (usable / self.line_spacing) as usize
    }

    /// The layout-only part of the configuration, for reporting.
    pub fn layout(&self) -> LayoutSettings {
        LayoutSettings {
            wrap_width: self.wrap_width,
            page_width: self.page_width,
            page_height: self.page_height,
            left_pad: self.left_pad,
            top_pad: self.top_pad,
            line_spacing: self.line_spacing,
            font_size: self.font_size,
            lines_per_page: self.lines_per_page(),
        }
    }

    fn validate(&self) -> Result<(), DocPagesError> {
        if self.wrap_width == 0 {
            return Err(DocPagesError::InvalidConfig(
                "wrap width must be ≥ 1 character".into(),
            ));
        }
        if self.page_width == 0 || self.page_height == 0 {
            return Err(DocPagesError::InvalidConfig(format!(
                "page size must be non-zero, got {}x{}",
                self.page_width, self.page_height
            )));
        }
        if self.line_spacing == 0 {
            return Err(DocPagesError::InvalidConfig(
                "line spacing must be ≥ 1 px".into(),
            ));
        }
        if self.left_pad >= self.page_width {
            return Err(DocPagesError::InvalidConfig(format!(
                "left padding {} leaves no room on a {} px wide page",
                self.left_pad, self.page_width
            )));
        }
        if self.lines_per_page() == 0 {
            return Err(DocPagesError::InvalidConfig(format!(
                "page height {} with padding {} and line spacing {} fits no lines",
                self.page_height, self.top_pad, self.line_spacing
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(DocPagesError::InvalidConfig(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(DocPagesError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                self.jpeg_quality
            )));
        }
        if self.render_concurrency == 0 {
            return Err(DocPagesError::InvalidConfig(
                "render concurrency must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn wrap_width(mut self, chars: usize) -> Self {
        self.config.wrap_width = chars;
        self
    }

    pub fn page_size(mut self, width: u32, height: u32) -> Self {
        self.config.page_width = width;
        self.config.page_height = height;
        self
    }

    /// Set both the left and top padding.
    pub fn padding(mut self, px: u32) -> Self {
        self.config.left_pad = px;
        self.config.top_pad = px;
        self
    }

    pub fn left_pad(mut self, px: u32) -> Self {
        self.config.left_pad = px;
        self
    }

    pub fn top_pad(mut self, px: u32) -> Self {
        self.config.top_pad = px;
        self
    }

    pub fn line_spacing(mut self, px: u32) -> Self {
        self.config.line_spacing = px;
        self
    }

    pub fn font_size(mut self, px: f32) -> Self {
        self.config.font_size = px;
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn image_format(mut self, format: ImageFormat) -> Self {
        self.config.image_format = format;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    pub fn keep_blank_paragraphs(mut self, v: bool) -> Self {
        self.config.keep_blank_paragraphs = v;
        self
    }

    pub fn render_concurrency(mut self, n: usize) -> Self {
        self.config.render_concurrency = n;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, DocPagesError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Raster format of the rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossy, small; the default for preview/printing.
    #[default]
    Jpeg,
    /// Lossless.
    Png,
}

impl ImageFormat {
    /// File extension used in `page-{n}.{ext}`.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// Resolved layout numbers, serialisable for logs and JSON reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub wrap_width: usize,
    pub page_width: u32,
    pub page_height: u32,
    pub left_pad: u32,
    pub top_pad: u32,
    pub line_spacing: u32,
    pub font_size: f32,
    pub lines_per_page: usize,
}
