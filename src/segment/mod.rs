//! Section segmentation of extracted page text.
//!
//! Converts per-page plain text into titled, typed [`Section`] records and
//! derives a best-effort title and abstract from the first page. Every
//! function here is pure and total over any input string: malformed or empty
//! text yields empty output, never an error.
//!
//! Classification is driven by an immutable [`SectionRules`] table that is
//! passed by reference, so pages can be segmented concurrently.
//!
//! # Example
//!
//! ```
//! use docmind::segment::{extract_sections, SectionRules};
//! use docmind::SectionType;
//!
//! let rules = SectionRules::shared();
//! let sections = extract_sections(rules, "2. Methodology\nwe counted widgets.", 1);
//!
//! assert_eq!(sections[0].section_type, SectionType::Methodology);
//! assert_eq!(sections[1].content, "we counted widgets.");
//! ```

mod front_matter;
mod page;
mod rules;

pub use front_matter::{extract_abstract, extract_title, UNTITLED};
pub use page::{extract_sections, page_content_title};
pub use rules::{HeadingRule, SectionRules, ABSTRACT_END_PATTERNS, STANDARD_RULES};

use crate::model::{Section, SectionType};

/// Classify a single line with the shared built-in rules.
pub fn classify_line(line: &str) -> Option<SectionType> {
    SectionRules::shared().classify(line)
}

/// Title and abstract derived from a document's first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    /// Detected title, or [`UNTITLED`]
    pub title: String,
    /// Detected abstract
    pub abstract_text: Option<String>,
}

impl FrontMatter {
    /// Run both first-page heuristics.
    pub fn from_first_page(rules: &SectionRules, first_page_text: &str) -> Self {
        Self {
            title: extract_title(first_page_text),
            abstract_text: extract_abstract(rules, first_page_text),
        }
    }
}

/// Segment a sequence of pages, numbering them from 1, in page order.
pub fn segment_pages<S: AsRef<str>>(rules: &SectionRules, pages: &[S]) -> Vec<Section> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(i, text)| extract_sections(rules, text.as_ref(), i as u32 + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line_uses_shared_rules() {
        assert_eq!(classify_line("2. Methodology"), Some(SectionType::Methodology));
        assert_eq!(classify_line("plain body text."), None);
    }

    #[test]
    fn test_front_matter() {
        let page = "Widget Durability Revisited\nAbstract\nWe examine widget durability across fifty trials in controlled lab settings.\n1. Introduction";
        let fm = FrontMatter::from_first_page(SectionRules::shared(), page);
        assert_eq!(fm.title, "Widget Durability Revisited");
        assert!(fm.abstract_text.unwrap().starts_with("We examine"));
    }

    #[test]
    fn test_front_matter_empty() {
        let fm = FrontMatter::from_first_page(SectionRules::shared(), "");
        assert_eq!(fm.title, UNTITLED);
        assert_eq!(fm.abstract_text, None);
    }

    #[test]
    fn test_segment_pages_orders_by_page() {
        let pages = ["first page body.", "", "third page body."];
        let sections = segment_pages(SectionRules::shared(), &pages);
        let numbers: Vec<_> = sections.iter().map(|s| s.page_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(sections[1].title, "Page 3 Content");
    }
}
