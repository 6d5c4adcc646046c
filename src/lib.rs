//! # docmind
//!
//! Section segmentation and retrieval-augmented question answering over
//! PDF documents.
//!
//! Pages of extracted text are split into titled, typed sections by a
//! heuristic heading classifier; the sections are indexed and retrieved to
//! answer natural-language questions through a pluggable answer model.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docmind::process_file;
//!
//! fn main() -> docmind::Result<()> {
//!     let doc = process_file("paper.pdf")?;
//!     println!("{} ({} pages)", doc.title, doc.page_count);
//!     for section in &doc.sections {
//!         println!("[{}] p{} {}", section.section_type, section.page_number, section.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - [`segment`]: heading classification, page segmentation, title and
//!   abstract heuristics (pure functions over text)
//! - [`process`]: extraction + segmentation into a [`Document`]
//! - [`index`]: index records and the [`SectionIndex`] seam
//! - [`search`]: paper search records and the [`PaperSearch`] seam
//! - [`rag`]: retrieval, prompting, and the [`Answerer`] seam
//! - [`library`]: document registry with id assignment and rollback

pub mod detect;
pub mod error;
pub mod extract;
pub mod index;
pub mod library;
pub mod model;
pub mod process;
pub mod rag;
pub mod render;
pub mod search;
pub mod segment;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{ErrorMode, PdfTextExtractor, TextExtractor};
pub use index::{index_records, IndexHit, IndexRecord, MemoryIndex, SectionIndex, SectionMetadata};
pub use library::{DocumentLibrary, DocumentSummary};
pub use model::{Document, DocumentStats, Section, SectionType};
pub use process::{DocumentProcessor, ProcessOptions};
pub use rag::{Answerer, QueryRequest, QueryResponse, RagEngine, RagOptions, Source};
pub use render::{to_json, JsonFormat};
pub use search::{Paper, PaperSearch, SearchRequest, SearchResponse};
pub use segment::{
    classify_line, extract_abstract, extract_sections, extract_title, FrontMatter, SectionRules,
};

use std::path::Path;

/// Process a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// let doc = docmind::process_file("paper.pdf").unwrap();
/// println!("Sections: {}", doc.sections.len());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocumentProcessor::new().process_file(path)
}

/// Process a PDF file with custom options.
pub fn process_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ProcessOptions,
) -> Result<Document> {
    DocumentProcessor::new()
        .with_options(options)
        .process_file(path)
}

/// Process PDF bytes with default options.
pub fn process_bytes(filename: &str, data: &[u8]) -> Result<Document> {
    DocumentProcessor::new().process_bytes(filename, data)
}

/// Segment one page of text with the built-in rules.
///
/// # Example
///
/// ```
/// let sections = docmind::segment_page("we measured widgets.", 3);
/// assert_eq!(sections[0].title, "Page 3 Content");
/// ```
pub fn segment_page(text: &str, page_number: u32) -> Vec<Section> {
    extract_sections(SectionRules::shared(), text, page_number)
}

/// Process a PDF file without blocking the async runtime.
#[cfg(feature = "async")]
pub async fn process_file_async<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| Error::processing(filename.as_str(), e.into()))?;

    tokio::task::spawn_blocking(move || process_bytes(&filename, &data))
        .await
        .map_err(|e| Error::Other(format!("Processing task failed: {}", e)))?
}
