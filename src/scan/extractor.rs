//! On-device text extraction
//!
//! OCR itself happens outside this crate. A [`TextExtractor`] hands back
//! whatever text the engine produced for an image, or `None` when there was
//! nothing to read.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ScanError;

/// Reference to a captured receipt image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    path: PathBuf,
}

impl ReceiptImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// String form stored on the transaction
    pub fn reference(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source of raw receipt text
pub trait TextExtractor {
    /// Extract text from the image; `Ok(None)` means nothing was found
    fn extract_text(&self, image: &ReceiptImage) -> Result<Option<String>, ScanError>;
}

/// Reads the text an OCR engine saved next to the image
///
/// For `receipt.jpg` the candidates are `receipt.jpg.txt`, then
/// `receipt.txt`. A missing sidecar means no text was found.
#[derive(Debug, Clone, Default)]
pub struct SidecarTextExtractor;

impl SidecarTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn candidates(image: &Path) -> Vec<PathBuf> {
        let mut appended = image.as_os_str().to_owned();
        appended.push(".txt");
        vec![PathBuf::from(appended), image.with_extension("txt")]
    }
}

impl TextExtractor for SidecarTextExtractor {
    fn extract_text(&self, image: &ReceiptImage) -> Result<Option<String>, ScanError> {
        if !image.path().exists() {
            return Err(ScanError::Unknown(format!(
                "Image not found: {}",
                image.path().display()
            )));
        }

        for candidate in Self::candidates(image.path()) {
            if candidate == image.path() || !candidate.exists() {
                continue;
            }
            debug!(sidecar = %candidate.display(), "reading extracted text");
            let text = fs::read_to_string(&candidate).map_err(|e| {
                ScanError::Unknown(format!("Failed to read {}: {}", candidate.display(), e))
            })?;
            return Ok(Some(text));
        }

        Ok(None)
    }
}
