//! Document-level types.

use super::{Section, SectionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A processed document: title, abstract, and its ordered sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque id assigned by the caller after processing (empty until then)
    pub file_id: String,

    /// Original file name
    pub filename: String,

    /// Display title
    pub title: String,

    /// Abstract text, when one was found on the first page
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Sections ordered by page, then discovery order
    pub sections: Vec<Section>,

    /// Number of pages in the source document
    pub page_count: u32,

    /// When the document was processed
    pub upload_time: DateTime<Utc>,

    /// Processing statistics
    pub metadata: DocumentStats,
}

impl Document {
    /// Create a document from processing results.
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        abstract_text: Option<String>,
        sections: Vec<Section>,
        page_count: u32,
    ) -> Self {
        let now = Utc::now();
        let metadata = DocumentStats {
            total_sections: sections.len(),
            has_abstract: abstract_text.is_some(),
            processed_at: now,
        };

        Self {
            file_id: String::new(),
            filename: filename.into(),
            title: title.into(),
            abstract_text,
            sections,
            page_count,
            upload_time: now,
            metadata,
        }
    }

    /// Assign the document id.
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = file_id.into();
        self
    }

    /// Sections found on a page (1-indexed).
    pub fn sections_on_page(&self, page_num: u32) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| s.page_number == page_num)
    }

    /// Sections of a given type.
    pub fn sections_of_type(&self, section_type: SectionType) -> impl Iterator<Item = &Section> {
        self.sections
            .iter()
            .filter(move |s| s.section_type == section_type)
    }

    /// Sections that carry body text.
    pub fn content_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.has_content())
    }

    /// Total word count across all section contents.
    pub fn word_count(&self) -> usize {
        self.sections.iter().map(Section::word_count).sum()
    }
}

/// Processing statistics kept alongside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of section records, heading records included
    pub total_sections: usize,

    /// Whether an abstract was found
    pub has_abstract: bool,

    /// Processing timestamp
    pub processed_at: DateTime<Utc>,
}
