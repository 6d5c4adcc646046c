//! Section-level types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a section heading.
///
/// The set is closed and only used for classification and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// Short capitalised line without terminal punctuation
    Title,
    /// Abstract or summary heading
    Abstract,
    /// Introduction heading
    Introduction,
    /// Method(s) / methodology heading
    Methodology,
    /// Results heading
    Results,
    /// Conclusion heading
    Conclusion,
    /// References or bibliography heading
    References,
    /// Generic numbered heading, also the tag of every content-bearing record
    Section,
}

impl SectionType {
    /// All types, in classification priority order.
    pub const ALL: [SectionType; 8] = [
        SectionType::Title,
        SectionType::Abstract,
        SectionType::Introduction,
        SectionType::Methodology,
        SectionType::Results,
        SectionType::Conclusion,
        SectionType::References,
        SectionType::Section,
    ];

    /// Lowercase tag used in index metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Title => "title",
            SectionType::Abstract => "abstract",
            SectionType::Introduction => "introduction",
            SectionType::Methodology => "methodology",
            SectionType::Results => "results",
            SectionType::Conclusion => "conclusion",
            SectionType::References => "references",
            SectionType::Section => "section",
        }
    }

    /// Whether a heading of this type opens a new section.
    ///
    /// Generic numbered headings are treated as body text.
    pub fn is_named(&self) -> bool {
        !matches!(self, SectionType::Section)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled block of text discovered on one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading line, or a synthesized `"Page N Content"` placeholder
    pub title: String,

    /// Body text joined with single spaces; empty for heading records
    pub content: String,

    /// Page the heading appeared on (1-indexed)
    pub page_number: u32,

    /// Semantic type
    pub section_type: SectionType,
}

impl Section {
    /// Create a new section.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        page_number: u32,
        section_type: SectionType,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            page_number,
            section_type,
        }
    }

    /// Create an empty-content heading record.
    pub fn heading(title: impl Into<String>, page_number: u32, section_type: SectionType) -> Self {
        Self::new(title, String::new(), page_number, section_type)
    }

    /// Whether the section carries any non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Number of whitespace-separated words in the content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_serde() {
        let json = serde_json::to_string(&SectionType::Methodology).unwrap();
        assert_eq!(json, "\"methodology\"");

        let parsed: SectionType = serde_json::from_str("\"references\"").unwrap();
        assert_eq!(parsed, SectionType::References);
    }

    #[test]
    fn test_section_type_named() {
        assert!(SectionType::Abstract.is_named());
        assert!(SectionType::Title.is_named());
        assert!(!SectionType::Section.is_named());
    }

    #[test]
    fn test_section_heading() {
        let section = Section::heading("Abstract", 1, SectionType::Abstract);
        assert!(!section.has_content());
        assert_eq!(section.word_count(), 0);
        assert_eq!(section.section_type.to_string(), "abstract");
    }
}
