//! Page text extraction.
//!
//! Extraction is delegated to a [`TextExtractor`]; the default
//! [`PdfTextExtractor`] reads PDFs with lopdf. Output is plain text per page,
//! in reading order, newline-delimited.

mod pdf;

pub use pdf::PdfTextExtractor;

use crate::error::Result;

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the whole document on any page error
    #[default]
    Strict,
    /// Log page errors and treat those pages as empty
    Lenient,
}

/// Trait for page text extractors.
///
/// Implement this trait to plug in a different extraction backend.
pub trait TextExtractor: Send + Sync {
    /// Get the name of this extractor.
    fn name(&self) -> &str;

    /// Get the supported file extensions for this extractor.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Extract the text of every page, in page order.
    fn page_texts(&self, bytes: &[u8], mode: ErrorMode) -> Result<Vec<String>>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}
