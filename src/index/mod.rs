//! Vector index seam.
//!
//! The embedding model and vector database sit behind [`SectionIndex`].
//! This module also defines how a [`Document`] is flattened into index
//! records: one record per content-bearing section, keyed by its position
//! in `Document::sections`, plus one for the abstract.

mod memory;

pub use memory::MemoryIndex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, Section, SectionType};

/// Metadata stored next to each indexed passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMetadata {
    /// Owning document id
    pub file_id: String,
    /// Owning document file name
    pub filename: String,
    /// Owning document title
    pub title: String,
    /// Section heading, or "Abstract"
    pub section_title: String,
    /// Section type
    pub section_type: SectionType,
    /// Page the section starts on (1-indexed)
    pub page_number: u32,
    /// Owning document title (kept alongside `title` for older consumers)
    pub document_title: String,
}

impl SectionMetadata {
    fn new(doc: &Document, section_title: &str, section_type: SectionType, page: u32) -> Self {
        Self {
            file_id: doc.file_id.clone(),
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            section_title: section_title.to_string(),
            section_type,
            page_number: page,
            document_title: doc.title.clone(),
        }
    }

    fn for_section(doc: &Document, section: &Section) -> Self {
        Self::new(
            doc,
            &section.title,
            section.section_type,
            section.page_number,
        )
    }
}

/// A passage ready to be embedded and stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Unique record id
    pub id: String,
    /// Passage text
    pub text: String,
    /// Passage metadata
    pub metadata: SectionMetadata,
}

/// A passage returned by a nearest-neighbour query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    /// Record id
    pub id: String,
    /// Passage text
    pub text: String,
    /// Passage metadata
    pub metadata: SectionMetadata,
    /// Cosine distance to the query (0 = identical)
    pub distance: f32,
}

impl IndexHit {
    /// Similarity score derived from the distance.
    pub fn relevance(&self) -> f32 {
        1.0 - self.distance
    }
}

/// Trait for vector index backends.
///
/// Implementations must apply a document's records (and their removal) as
/// a unit, so readers never observe a half-indexed document.
pub trait SectionIndex: Send + Sync {
    /// Get the name of this index backend.
    fn name(&self) -> &str;

    /// Store records. Either all records are stored or none are.
    fn add(&self, records: Vec<IndexRecord>) -> Result<()>;

    /// Remove every record of a document, returning how many were removed.
    fn remove_document(&self, file_id: &str) -> Result<usize>;

    /// Return up to `n_results` nearest passages, optionally restricted to
    /// the given document ids, closest first.
    fn query(&self, text: &str, n_results: usize, filter: Option<&[String]>)
        -> Result<Vec<IndexHit>>;

    /// All passage texts of one document, in insertion order.
    fn document_texts(&self, file_id: &str) -> Result<Vec<String>>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Check if the index holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Record id for the section at `position` in `Document::sections`.
pub fn section_record_id(file_id: &str, position: usize) -> String {
    format!("{}_section_{}", file_id, position)
}

/// Record id for a document's abstract.
pub fn abstract_record_id(file_id: &str) -> String {
    format!("{}_abstract", file_id)
}

/// Flatten a document into index records.
///
/// Sections with blank content are skipped but still consume their
/// position, so ids stay stable for the same document.
pub fn index_records(doc: &Document) -> Vec<IndexRecord> {
    let mut records: Vec<IndexRecord> = doc
        .sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.has_content())
        .map(|(i, section)| IndexRecord {
            id: section_record_id(&doc.file_id, i),
            text: section.content.clone(),
            metadata: SectionMetadata::for_section(doc, section),
        })
        .collect();

    if let Some(ref abstract_text) = doc.abstract_text {
        records.push(IndexRecord {
            id: abstract_record_id(&doc.file_id),
            text: abstract_text.clone(),
            metadata: SectionMetadata::new(doc, "Abstract", SectionType::Abstract, 1),
        });
    }

    records
}
