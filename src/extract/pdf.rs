//! PDF page text extraction using lopdf.

use lopdf::Document as LopdfDocument;

use crate::detect::pdf_version;
use crate::error::{Error, Result};

use super::{ErrorMode, TextExtractor};

/// PDF text extractor backed by lopdf.
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    _private: (),
}

impl PdfTextExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    fn load(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        let version = pdf_version(bytes)?;
        log::debug!("Loading PDF {} ({} bytes)", version, bytes.len());

        LopdfDocument::load_mem(bytes).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })
    }
}

impl TextExtractor for PdfTextExtractor {
    fn name(&self) -> &str {
        "pdf"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn page_texts(&self, bytes: &[u8], mode: ErrorMode) -> Result<Vec<String>> {
        let doc = self.load(bytes)?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        collect_pages(&page_numbers, mode, |page_num| doc.extract_text(&[page_num]))
    }
}

/// Extract each page in order. Lenient mode turns a failed page into an empty one.
fn collect_pages<F, E>(
    page_numbers: &[u32],
    mode: ErrorMode,
    mut extract: F,
) -> Result<Vec<String>>
where
    F: FnMut(u32) -> std::result::Result<String, E>,
    E: std::fmt::Display,
{
    let mut texts = Vec::with_capacity(page_numbers.len());

    for &page_num in page_numbers {
        match extract(page_num) {
            Ok(text) => texts.push(text),
            Err(e) => {
                if mode == ErrorMode::Strict {
                    return Err(Error::TextExtract(format!("Page {}: {}", page_num, e)));
                }
                log::warn!("Failed to extract text from page {}: {}", page_num, e);
                texts.push(String::new());
            }
        }
    }

    Ok(texts)
}
