//! Image encoding: rendered canvas → JPEG/PNG bytes, and base64 transport.
//!
//! JPEG is the default: pages are black text on a flat white background and
//! are meant for preview/printing, where a quality-85 JPEG is a fraction of
//! the PNG size. PNG is available when callers need lossless pixels.

use crate::config::ImageFormat;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use tracing::debug;

/// Serialise a page canvas in the requested format.
///
/// `quality` applies to JPEG only (1–100).
pub fn encode_canvas(
    canvas: &RgbImage,
    format: ImageFormat,
    quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let (width, height) = canvas.dimensions();

    match format {
        ImageFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ImageFormat::Png => {
            PngEncoder::new(&mut buf).write_image(
                canvas.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }

    debug!("Encoded {}x{} canvas → {} bytes {:?}", width, height, buf.len(), format);
    Ok(buf)
}

/// Standard-alphabet, padded base64 for the JSON response body.
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
