//! Input resolution: normalise a user-supplied path or URL to document bytes.
//!
//! The whole document is held in memory; there is no streaming. The ZIP
//! signature is checked here so a PDF or a text file passed by mistake is
//! reported as "not a DOCX" before the parser ever sees it.

use crate::docx::{has_zip_magic, ZIP_MAGIC};
use crate::error::DocPagesError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Read the document named by `input`: a local path or an HTTP/HTTPS URL.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Vec<u8>, DocPagesError> {
    if input.trim().is_empty() {
        return Err(DocPagesError::InvalidInput {
            input: input.to_string(),
        });
    }

    let bytes = if is_url(input) {
        download_url(input, timeout_secs).await?
    } else {
        read_local(input).await?
    };

    check_magic(&bytes)?;
    Ok(bytes)
}

/// Reject bytes that cannot be a DOCX container.
pub fn check_magic(bytes: &[u8]) -> Result<(), DocPagesError> {
    if has_zip_magic(bytes) {
        return Ok(());
    }
    Err(DocPagesError::NotADocx {
        magic: bytes[..bytes.len().min(ZIP_MAGIC.len())].to_vec(),
    })
}

async fn read_local(path_str: &str) -> Result<Vec<u8>, DocPagesError> {
    let path = PathBuf::from(path_str);

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => DocPagesError::PermissionDenied { path: path.clone() },
        _ => DocPagesError::FileNotFound { path: path.clone() },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, DocPagesError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocPagesError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            DocPagesError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            DocPagesError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(DocPagesError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DocPagesError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
