//! Pipeline stages for document pagination.
//!
//! Each submodule implements exactly one transformation step and owns its
//! input: a stage consumes what the previous one produced and hands its own
//! output downstream without keeping references behind.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ wrap ──▶ paginate ──▶ render ──▶ encode
//! (path/URL) (paragraphs) (lines)  (pages)    (canvas)   (JPEG/PNG)
//! ```
//!
//! 1. [`input`]    — read a local file or download a URL to document bytes
//! 2. [`extract`]  — drop blank paragraphs, keep order (text mode stops here)
//! 3. [`wrap`]     — greedy word-wrap each paragraph to a fixed char width
//! 4. [`paginate`] — chunk the flat line stream into fixed-capacity pages
//! 5. [`render`]   — place lines at fixed coordinates and rasterise;
//!    CPU-bound, so the async entry points run it on the blocking pool
//! 6. [`encode`]   — serialise the canvas, base64 for JSON transport

pub mod encode;
pub mod extract;
pub mod input;
pub mod paginate;
pub mod render;
pub mod wrap;
