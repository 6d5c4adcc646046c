//! Registry of processed documents backed by a section index.
//!
//! [`DocumentLibrary`] assigns document ids, keeps the index and the
//! registry consistent, and adds the library-level behaviour around
//! questions (empty-library answer, paper search note).

use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::process::DocumentProcessor;
use crate::rag::{QueryRequest, QueryResponse, RagEngine};
use crate::search::is_paper_query;

/// Maximum number of files accepted in one batch upload.
pub const MAX_BATCH_FILES: usize = 5;

/// Answer given when nothing has been uploaded and paper search does not apply.
pub const NO_DOCUMENTS_ANSWER: &str =
    "No documents have been uploaded yet. Please upload some PDF documents first.";

/// Note appended to answers that cite paper search results.
pub const PAPER_SOURCES_NOTE: &str = "I've also found some relevant papers on ArXiv that might be helpful. You can check the sources below for links to these papers.";

/// Short description of an ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Assigned id
    pub file_id: String,
    /// Original file name
    pub filename: String,
    /// Detected title
    pub title: String,
    /// Number of section records
    pub sections: usize,
    /// Number of pages
    pub pages: u32,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            file_id: doc.file_id.clone(),
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            sections: doc.sections.len(),
            pages: doc.page_count,
        }
    }
}

/// Processed documents and the engine that answers questions about them.
pub struct DocumentLibrary {
    processor: DocumentProcessor,
    engine: RagEngine,
    documents: RwLock<Vec<Document>>,
    // Serializes ingest and removal so the index and registry change together.
    write_lock: Mutex<()>,
}

impl DocumentLibrary {
    /// Create an empty library.
    pub fn new(processor: DocumentProcessor, engine: RagEngine) -> Self {
        Self {
            processor,
            engine,
            documents: RwLock::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// The question-answering engine.
    pub fn engine(&self) -> &RagEngine {
        &self.engine
    }

    /// The document processor.
    pub fn processor(&self) -> &DocumentProcessor {
        &self.processor
    }

    /// Process, index, and register one uploaded PDF.
    ///
    /// A document that fails processing or indexing leaves no trace in the
    /// index or the registry.
    pub fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<DocumentSummary> {
        if !has_pdf_extension(filename) {
            return Err(Error::InvalidUpload(format!(
                "Only PDF files are allowed: {}",
                filename
            )));
        }

        let file_id = Uuid::new_v4().to_string();
        let doc = self
            .processor
            .process_bytes(filename, bytes)?
            .with_file_id(file_id.as_str());
        self.register(doc)
    }

    /// Index and register an already processed document.
    ///
    /// Documents without an id get a fresh one. An id that is already
    /// registered or indexed is rejected with [`Error::InvalidUpload`].
    pub fn register(&self, mut doc: Document) -> Result<DocumentSummary> {
        if doc.file_id.is_empty() {
            doc.file_id = Uuid::new_v4().to_string();
        }

        let _guard = self.write_lock.lock().map_err(|_| poisoned())?;

        // Rollback removes by file id, so the id must not be in use yet.
        let indexed = self.engine.index().document_texts(&doc.file_id)?;
        if self.contains(&doc.file_id) || !indexed.is_empty() {
            return Err(Error::InvalidUpload(format!(
                "Document id already in use: {}",
                doc.file_id
            )));
        }

        if let Err(e) = self.engine.add_document(&doc) {
            if let Err(cleanup) = self.engine.remove_document(&doc.file_id) {
                log::warn!("Failed to roll back index for {}: {}", doc.file_id, cleanup);
            }
            return Err(Error::processing(doc.filename.clone(), e));
        }

        let summary = DocumentSummary::from(&doc);
        log::info!(
            "Registered {} as {} ({} sections, {} pages)",
            summary.filename,
            summary.file_id,
            summary.sections,
            summary.pages
        );
        self.documents.write().map_err(|_| poisoned())?.push(doc);
        Ok(summary)
    }

    /// Ingest up to [`MAX_BATCH_FILES`] uploads, in order.
    ///
    /// Every file name is validated before any file is processed. Processing
    /// stops at the first failure; documents ingested before it are kept.
    pub fn ingest_batch<N, B>(&self, files: &[(N, B)]) -> Result<Vec<DocumentSummary>>
    where
        N: AsRef<str>,
        B: AsRef<[u8]>,
    {
        if files.len() > MAX_BATCH_FILES {
            return Err(Error::InvalidUpload(format!(
                "Maximum {} files allowed",
                MAX_BATCH_FILES
            )));
        }
        if let Some((name, _)) = files.iter().find(|(name, _)| !has_pdf_extension(name.as_ref())) {
            return Err(Error::InvalidUpload(format!(
                "Only PDF files are allowed: {}",
                name.as_ref()
            )));
        }

        files
            .iter()
            .map(|(name, bytes)| self.ingest(name.as_ref(), bytes.as_ref()))
            .collect()
    }

    /// Remove a document and its index records.
    pub fn remove(&self, file_id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| poisoned())?;

        if !self.contains(file_id) {
            return Err(Error::DocumentNotFound(file_id.to_string()));
        }

        let removed = self.engine.remove_document(file_id)?;
        self.documents
            .write()
            .map_err(|_| poisoned())?
            .retain(|d| d.file_id != file_id);

        log::info!("Removed {} ({} index records)", file_id, removed);
        Ok(())
    }

    /// Get a copy of a document.
    pub fn get(&self, file_id: &str) -> Option<Document> {
        self.documents
            .read()
            .ok()?
            .iter()
            .find(|d| d.file_id == file_id)
            .cloned()
    }

    /// Check if a document is registered.
    pub fn contains(&self, file_id: &str) -> bool {
        self.documents
            .read()
            .map(|docs| docs.iter().any(|d| d.file_id == file_id))
            .unwrap_or(false)
    }

    /// Copies of all documents, in upload order.
    pub fn list(&self) -> Vec<Document> {
        self.documents
            .read()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Answer a question over the library.
    pub fn ask(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if self.is_empty() && !is_paper_query(&request.query) {
            return Ok(QueryResponse::empty(NO_DOCUMENTS_ANSWER));
        }

        let mut response = self.engine.query(request)?;

        if response.sources.iter().any(|s| s.is_paper()) {
            if !response.answer.ends_with('.') {
                response.answer.push('.');
            }
            response.answer.push_str("\n\n");
            response.answer.push_str(PAPER_SOURCES_NOTE);
        }

        Ok(response)
    }

    /// Summarize a registered document.
    pub fn summarize(&self, file_id: &str) -> Result<String> {
        if !self.contains(file_id) {
            return Err(Error::DocumentNotFound(file_id.to_string()));
        }
        self.engine.summarize_document(file_id)
    }
}

fn poisoned() -> Error {
    Error::Other("document library lock poisoned".into())
}
