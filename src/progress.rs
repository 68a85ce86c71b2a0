//! Progress-callback trait for per-page rendering events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the image pipeline renders each page. Text-mode conversions
//! produce no pages and fire no events.
//!
//! # Example
//!
//! ```rust
//! use docx_pages::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_page_rendered(&self, page_num: usize, total_pages: usize, bytes: usize) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {}/{} ({} bytes)", page_num, total_pages, bytes);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the image pipeline as it renders each page.
///
/// Implementations must be `Send + Sync` because the converter is shared
/// across tasks. Events for one conversion come from a single task and in
/// page order, even when the async entry points render several pages at
/// once. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after pagination, before any page is rendered.
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when a page has been rasterised and encoded.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `bytes`       — encoded image size
    fn on_page_rendered(&self, page_num: usize, total_pages: usize, bytes: usize) {
        let _ = (page_num, total_pages, bytes);
    }

    /// Called once after every page has been rendered.
    fn on_conversion_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
