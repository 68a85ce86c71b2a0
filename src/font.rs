//! Glyph resources used by the page renderer.
//!
//! The renderer never looks a font up on its own. A [`GlyphPainter`] is
//! loaded once at process start ([`load_font`]), wrapped in an `Arc`, and
//! handed to the [`crate::Converter`]; every request then borrows it
//! read-only. A missing or unreadable font is a startup failure
//! ([`DocPagesError::ResourceInit`]), not a per-request error.
//!
//! [`BlockFont`] is a stand-in that paints one filled box per visible
//! character. It needs no font file, which makes it the painter of choice
//! for tests and for environments where only line placement matters.

use crate::config::ConversionConfig;
use crate::error::DocPagesError;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Locations tried, in order, when no font path is configured.
pub const FALLBACK_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Draws one line of text onto a page canvas.
///
/// Implementations hold their size internally so every line of every page
/// is painted with the same face and size.
pub trait GlyphPainter: Send + Sync {
    /// Paint `text` with its top-left corner at `(x, y)`.
    fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// A TrueType/OpenType face rendered through `imageproc`.
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
    source: PathBuf,
}

impl TrueTypeFont {
    /// Load a font file and fix its pixel size.
    pub fn from_file(path: &Path, size_px: f32) -> Result<Self, DocPagesError> {
        let bytes = std::fs::read(path).map_err(|e| DocPagesError::ResourceInit {
            resource: format!("font '{}'", path.display()),
            detail: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| DocPagesError::ResourceInit {
            resource: format!("font '{}'", path.display()),
            detail: e.to_string(),
        })?;
        Ok(Self {
            font,
            scale: PxScale::from(size_px),
            source: path.to_path_buf(),
        })
    }
}

impl GlyphPainter for TrueTypeFont {
    fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }

    fn describe(&self) -> String {
        format!("{} @ {}px", self.source.display(), self.scale.y)
    }
}

/// Font-free stand-in: one filled box per non-whitespace character.
///
/// Boxes advance by `0.6 × size` and are `0.5 × size` wide and
/// `0.7 × size` tall, which is close enough to a sans face to keep line
/// extents realistic.
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    size: f32,
}

impl BlockFont {
    pub fn new(size_px: f32) -> Self {
        Self {
            size: size_px.max(1.0),
        }
    }

    fn advance(&self) -> i32 {
        ((self.size * 0.6).round() as i32).max(1)
    }
}

impl GlyphPainter for BlockFont {
    fn draw_line(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let w = ((self.size * 0.5).round() as u32).max(1);
        let h = ((self.size * 0.7).round() as u32).max(1);
        let advance = self.advance();
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = x + advance * i as i32;
            draw_filled_rect_mut(canvas, Rect::at(left, y).of_size(w, h), color);
        }
    }

    fn describe(&self) -> String {
        format!("block glyphs @ {}px", self.size)
    }
}

/// Load the process-wide painter described by `config`.
///
/// Uses `config.font_path` when set; otherwise the first readable entry of
/// [`FALLBACK_FONT_PATHS`].
pub fn load_font(config: &ConversionConfig) -> Result<Arc<dyn GlyphPainter>, DocPagesError> {
    let font = match config.font_path {
        Some(ref path) => TrueTypeFont::from_file(path, config.font_size)?,
        None => {
            let found = FALLBACK_FONT_PATHS
                .iter()
                .map(Path::new)
                .find(|p| p.is_file())
                .ok_or_else(|| DocPagesError::ResourceInit {
                    resource: "font".to_string(),
                    detail: "no font configured and none of the well-known system fonts \
                             exist; pass --font /path/to/font.ttf"
                        .to_string(),
                })?;
            debug!("No font configured, using {}", found.display());
            TrueTypeFont::from_file(found, config.font_size)?
        }
    };
    info!("Loaded font: {}", font.describe());
    Ok(Arc::new(font))
}
