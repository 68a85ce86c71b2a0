//! Page rendering: a [`Page`] of lines → a fixed-size raster canvas.
//!
//! Layout is a pure function of the page and the configuration: line `k`
//! (0-indexed) sits at `(left_pad, top_pad + k × line_spacing)`. The
//! placements are computed first ([`layout_page`]) and only then painted, so
//! the line-to-coordinate mapping can be checked independently of whatever
//! bytes the raster encoder produces.
//!
//! Rendering is CPU-bound. The async entry points in [`crate::convert`] call
//! [`render_and_encode`] from `spawn_blocking`; everything here is
//! synchronous and shares nothing mutable, so pages may be rendered in
//! parallel.

use crate::config::ConversionConfig;
use crate::error::DocPagesError;
use crate::font::GlyphPainter;
use crate::output::RenderedPage;
use crate::pipeline::encode;
use crate::pipeline::paginate::Page;
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Where one line lands on the canvas (top-left corner of its text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePlacement {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// The full coordinate mapping of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_num: usize,
    pub width: u32,
    pub height: u32,
    pub lines: Vec<LinePlacement>,
}

/// Compute line placements for `page`.
pub fn layout_page(page: &Page, config: &ConversionConfig) -> PageLayout {
    let x = config.left_pad as i32;
    let lines = page
        .lines
        .iter()
        .enumerate()
        .map(|(k, text)| LinePlacement {
            x,
            y: (config.top_pad as usize + k * config.line_spacing as usize) as i32,
            text: text.clone(),
        })
        .collect();

    PageLayout {
        page_num: page.number,
        width: config.page_width,
        height: config.page_height,
        lines,
    }
}

/// Paint a layout onto a fresh `width × height` canvas.
pub fn paint(layout: &PageLayout, font: &dyn GlyphPainter) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, BACKGROUND);
    for line in layout.lines.iter().filter(|l| !l.text.is_empty()) {
        font.draw_line(&mut canvas, line.x, line.y, &line.text, INK);
    }
    canvas
}

/// Lay out and paint one page.
pub fn render_page(page: &Page, config: &ConversionConfig, font: &dyn GlyphPainter) -> RgbImage {
    paint(&layout_page(page, config), font)
}

/// Lay out, paint and encode one page.
///
/// Blocking; run it on a blocking-capable thread from async code.
pub fn render_and_encode(
    page: &Page,
    config: &ConversionConfig,
    font: &dyn GlyphPainter,
) -> Result<RenderedPage, DocPagesError> {
    let layout = layout_page(page, config);
    let canvas = paint(&layout, font);

    let bytes = encode::encode_canvas(&canvas, config.image_format, config.jpeg_quality).map_err(
        |e| DocPagesError::EncodeFailed {
            page: page.number,
            detail: e.to_string(),
        },
    )?;

    debug!(
        "Rendered page {} → {} lines, {} bytes",
        page.number,
        layout.lines.len(),
        bytes.len()
    );

    Ok(RenderedPage {
        page_num: page.number,
        file_name: format!("page-{}.{}", page.number, config.image_format.extension()),
        mime_type: config.image_format.mime_type().to_string(),
        bytes,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageFormat;
    use crate::font::BlockFont;

    fn page(number: usize, lines: &[&str]) -> Page {
        Page {
            number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn small_config() -> ConversionConfig {
        ConversionConfig::builder()
            .page_size(200, 160)
            .padding(10)
            .line_spacing(20)
            .font_size(10.0)
            .image_format(ImageFormat::Png)
            .build()
            .unwrap()
    }

    #[test]
    fn default_coordinates_follow_formula() {
        let config = ConversionConfig::default();
        let layout = layout_page(&page(1, &["a", "b", "c"]), &config);
        let coords: Vec<(i32, i32)> = layout.lines.iter().map(|l| (l.x, l.y)).collect();
        assert_eq!(coords, vec![(80, 80), (80, 140), (80, 200)]);
        assert_eq!((layout.width, layout.height), (1600, 2200));
    }

    #[test]
    fn last_line_of_full_page_fits_canvas() {
        let config = ConversionConfig::default();
        let lines: Vec<String> = (0..config.lines_per_page()).map(|i| i.to_string()).collect();
        let layout = layout_page(&Page { number: 1, lines }, &config);
        let last = layout.lines.last().unwrap();
        assert!(last.y as u32 + config.line_spacing <= config.page_height - config.top_pad);
    }

    #[test]
    fn canvas_has_exact_size_and_ink_at_placements() {
        let config = small_config();
        let canvas = render_page(&page(1, &["ab", "", "cd"]), &config, &BlockFont::new(10.0));
        assert_eq!(canvas.dimensions(), (200, 160));
        assert_eq!(canvas.get_pixel(10, 10), &INK);
        // Blank second line leaves its row untouched.
        assert_eq!(canvas.get_pixel(10, 30), &BACKGROUND);
        assert_eq!(canvas.get_pixel(10, 50), &INK);
        // Background elsewhere.
        assert_eq!(canvas.get_pixel(199, 159), &BACKGROUND);
    }

    #[test]
    fn rendered_page_naming() {
        let config = small_config();
        let rendered =
            render_and_encode(&page(3, &["x"]), &config, &BlockFont::new(10.0)).unwrap();
        assert_eq!(rendered.file_name, "page-3.png");
        assert_eq!(rendered.mime_type, "image/png");
        assert_eq!(rendered.page_num, 3);
        let decoded = image::load_from_memory(&rendered.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 160));
    }

    #[test]
    fn jpeg_naming_by_default() {
        let config = ConversionConfig::builder()
            .page_size(100, 100)
            .padding(10)
            .line_spacing(20)
            .build()
            .unwrap();
        let rendered = render_and_encode(&page(1, &["x"]), &config, &BlockFont::new(10.0)).unwrap();
        assert_eq!(rendered.file_name, "page-1.jpg");
        assert_eq!(rendered.mime_type, "image/jpeg");
    }

    #[test]
    fn layout_is_deterministic() {
        let config = ConversionConfig::default();
        let p = page(2, &["one", "two"]);
        assert_eq!(layout_page(&p, &config), layout_page(&p, &config));
    }
}
