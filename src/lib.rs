//! # docx-pages
//!
//! Turn a Word (`.docx`) document into fixed-size page images, or into flat
//! text.
//!
//! The page images are a plain preview: every paragraph is re-flowed to a
//! fixed character width and drawn line by line in a single face on a
//! white canvas. Styling, images and tables are not carried over. What you
//! get is a deterministic, paginated rendering of the document's words.
//!
//! ## Pipeline Overview
//!
//! ```text
//! DOCX bytes
//!  │
//!  ├─ 1. Input     resolve local file or download from URL, check ZIP magic
//!  ├─ 2. Parse     word/document.xml → ordered paragraph strings
//!  ├─ 3. Extract   drop blank paragraphs
//!  │     ├─ text   join with "\n"                       → TextResponse
//!  │     └─ images
//!  ├─ 4. Wrap      greedy word wrap to `wrap_width` chars
//!  ├─ 5. Paginate  fixed-capacity chunks of lines
//!  ├─ 6. Render    one canvas per page (CPU-bound, spawn_blocking)
//!  └─ 7. Encode    JPEG/PNG → base64                    → PagesResponse
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docx_pages::{ConversionConfig, Converter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     // Loads the configured font, or the first system fallback found.
//!     let converter = Converter::from_config(config)?;
//!
//!     let bytes = std::fs::read("report.docx")?;
//!     let output = converter.convert_pages(bytes).await?;
//!     for page in &output.pages {
//!         println!("{} ({} bytes)", page.file_name, page.bytes.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `docx2pages` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `server` | on      | Enables [`server`]: an axum router for the HTTP boundary |
//!
//! Disable both when using only the library:
//! ```toml
//! docx-pages = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod docx;
pub mod error;
pub mod font;
pub mod output;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ImageFormat, LayoutSettings};
pub use convert::{
    text_from_bytes, text_from_bytes_blocking, write_pages, ConversionMode, Converter,
};
pub use docx::Document;
pub use error::DocPagesError;
pub use font::{load_font, BlockFont, GlyphPainter, TrueTypeFont};
pub use output::{
    ConversionOutput, ConversionResponse, ConversionStats, ErrorResponse, PageEntry,
    PagesResponse, RenderedPage, TextResponse,
};
pub use pipeline::paginate::Page;
pub use pipeline::render::{LinePlacement, PageLayout};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
