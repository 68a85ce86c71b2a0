//! Error types for the docx-pages library.
//!
//! There is a single fatal error type, [`DocPagesError`]. The layout stages
//! (wrap, paginate, layout) are total over their input and never fail; what
//! can fail is everything around them:
//!
//! * **Client errors** — the caller handed us something that is not a
//!   document we can read. These are recoverable and map to a 4xx at the
//!   HTTP boundary ([`DocPagesError::is_client_error`]).
//!
//! * **Startup errors** — a font cannot be loaded or the layout constants
//!   leave no room for a single line. These are raised while building the
//!   [`crate::Converter`], never mid-request.
//!
//! A conversion either succeeds with every page or fails as a whole; no
//! partial page list is ever returned alongside an error.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the docx-pages library.
#[derive(Debug, Error)]
pub enum DocPagesError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The bytes were read but do not start with a ZIP container signature.
    #[error("Input is not a DOCX document: first bytes {magic:?}")]
    NotADocx { magic: Vec<u8> },

    // ── Document errors ───────────────────────────────────────────────────
    /// The container or its main XML part could not be parsed.
    #[error("Failed to parse document: {message}")]
    DocumentParse { message: String },

    // ── Startup errors ────────────────────────────────────────────────────
    /// A process-wide resource (font) could not be initialised.
    #[error("Failed to initialise {resource}: {detail}")]
    ResourceInit { resource: String, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Render errors ─────────────────────────────────────────────────────
    /// The raster encoder rejected a rendered canvas.
    #[error("Encoding failed for page {page}: {detail}")]
    EncodeFailed { page: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output page file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a worker task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocPagesError {
    /// Shorthand for a [`DocPagesError::DocumentParse`] carrying the
    /// parser's diagnostic.
    pub fn parse(message: impl std::fmt::Display) -> Self {
        DocPagesError::DocumentParse {
            message: message.to_string(),
        }
    }

    /// True when the failure was caused by the request payload rather than
    /// by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocPagesError::DocumentParse { .. }
                | DocPagesError::NotADocx { .. }
                | DocPagesError::InvalidInput { .. }
        )
    }
}
