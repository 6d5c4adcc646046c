//! Document processing: extraction, normalization, and segmentation.

mod options;

pub use options::ProcessOptions;

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::extract::{PdfTextExtractor, TextExtractor};
use crate::model::{Document, Section};
use crate::segment::{extract_sections, segment_pages, FrontMatter, SectionRules};

/// Turns raw document bytes into a [`Document`].
///
/// A document that fails extraction is rejected whole: every failure is
/// returned as [`Error::Processing`] with the cause as its source.
pub struct DocumentProcessor {
    extractor: Arc<dyn TextExtractor>,
    rules: Arc<SectionRules>,
    options: ProcessOptions,
}

impl DocumentProcessor {
    /// Create a processor using the PDF extractor and the built-in rules.
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(PdfTextExtractor::new()))
    }

    /// Create a processor with a custom extractor.
    pub fn with_extractor(extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            rules: Arc::new(SectionRules::standard()),
            options: ProcessOptions::default(),
        }
    }

    /// Use a custom heading rule table.
    pub fn with_rules(mut self, rules: SectionRules) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Set processing options.
    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    /// Processing options.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Heading rules.
    pub fn rules(&self) -> &SectionRules {
        &self.rules
    }

    /// Page text extractor.
    pub fn extractor(&self) -> &dyn TextExtractor {
        self.extractor.as_ref()
    }

    /// Read and process a file.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path).map_err(|e| Error::processing(&filename, e.into()))?;
        self.process_bytes(&filename, &bytes)
    }

    /// Process document bytes.
    pub fn process_bytes(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        log::info!("Processing document: {}", filename);

        let pages = self
            .extractor
            .page_texts(bytes, self.options.error_mode)
            .map_err(|e| Error::processing(filename, e))?;

        self.process_pages(filename, &pages)
    }

    /// Build a document from already extracted page texts.
    pub fn process_pages<S: AsRef<str> + Sync>(
        &self,
        filename: &str,
        pages: &[S],
    ) -> Result<Document> {
        if pages.is_empty() {
            return Err(Error::processing(filename, Error::EmptyDocument));
        }

        let texts: Vec<Cow<'_, str>> = pages
            .iter()
            .map(|page| self.normalize(page.as_ref()))
            .collect();

        let front = FrontMatter::from_first_page(&self.rules, &texts[0]);

        let limit = match self.options.max_pages {
            0 => texts.len(),
            max => texts.len().min(max as usize),
        };
        let sections = self.segment(&texts[..limit]);

        log::info!(
            "Document processed - Title: {}, Sections: {}, Pages: {}",
            front.title,
            sections.len(),
            pages.len()
        );

        Ok(Document::new(
            filename,
            front.title,
            front.abstract_text,
            sections,
            pages.len() as u32,
        ))
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.normalize_unicode {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn segment(&self, pages: &[Cow<'_, str>]) -> Vec<Section> {
        if !self.options.parallel || pages.len() < 2 {
            return segment_pages(&self.rules, pages);
        }

        let rules = self.rules.as_ref();
        pages
            .par_iter()
            .enumerate()
            .map(|(i, text)| extract_sections(rules, text, i as u32 + 1))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ErrorMode;
    use crate::model::SectionType;
    use crate::segment::UNTITLED;

    const PAGE_ONE: &str = "Widget Durability Revisited\nAbstract\nWe examine widget durability across fifty trials in controlled lab settings.\n1. Introduction\nwidgets matter.";
    const PAGE_TWO: &str = "2. Methodology\nwe counted widgets.\nresults.\nall widgets survived.";

    struct FailingExtractor;

    impl TextExtractor for FailingExtractor {
        fn name(&self) -> &str {
            "failing"
        }

        fn supported_extensions(&self) -> &[&str] {
            &["pdf"]
        }

        fn page_texts(&self, _bytes: &[u8], _mode: ErrorMode) -> Result<Vec<String>> {
            Err(Error::TextExtract("boom".into()))
        }
    }

    #[test]
    fn test_process_pages() {
        let processor = DocumentProcessor::new();
        let doc = processor.process_pages("widgets.pdf", &[PAGE_ONE, PAGE_TWO]).unwrap();

        assert_eq!(doc.filename, "widgets.pdf");
        assert_eq!(doc.title, "Widget Durability Revisited");
        assert!(doc.abstract_text.is_some());
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.metadata.total_sections, doc.sections.len());
        assert!(doc.metadata.has_abstract);
        assert!(doc.file_id.is_empty());

        let pages: Vec<_> = doc.sections.iter().map(|s| s.page_number).collect();
        let mut sorted = pages.clone();
        sorted.sort();
        assert_eq!(pages, sorted);
        assert_eq!(doc.sections_of_type(SectionType::Methodology).count(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages = vec![PAGE_ONE, PAGE_TWO, PAGE_ONE, PAGE_TWO];
        let parallel = DocumentProcessor::new().process_pages("a.pdf", &pages).unwrap();
        let sequential = DocumentProcessor::new()
            .with_options(ProcessOptions::new().sequential())
            .process_pages("a.pdf", &pages)
            .unwrap();

        assert_eq!(parallel.sections, sequential.sections);
    }

    #[test]
    fn test_empty_document_rejected() {
        let processor = DocumentProcessor::new();
        let pages: [&str; 0] = [];
        let err = processor.process_pages("empty.pdf", &pages).unwrap_err();

        match err {
            Error::Processing { filename, source } => {
                assert_eq!(filename, "empty.pdf");
                assert!(matches!(*source, Error::EmptyDocument));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_pages_yield_fallbacks() {
        let doc = DocumentProcessor::new()
            .process_pages("blank.pdf", &["", "\n\n"])
            .unwrap();
        assert_eq!(doc.title, UNTITLED);
        assert!(doc.abstract_text.is_none());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn test_max_pages_limits_segmentation() {
        let doc = DocumentProcessor::new()
            .with_options(ProcessOptions::new().with_max_pages(1))
            .process_pages("a.pdf", &[PAGE_ONE, PAGE_TWO])
            .unwrap();
        assert!(doc.sections.iter().all(|s| s.page_number == 1));
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn test_unicode_normalization() {
        // "e" + combining acute accent composes to U+00E9
        let doc = DocumentProcessor::new()
            .process_pages("a.pdf", &["caf\u{0065}\u{0301} au lait."])
            .unwrap();
        assert_eq!(doc.sections[0].content, "caf\u{00e9} au lait.");

        let doc = DocumentProcessor::new()
            .with_options(ProcessOptions::new().with_unicode_normalization(false))
            .process_pages("a.pdf", &["caf\u{0065}\u{0301} au lait."])
            .unwrap();
        assert_eq!(doc.sections[0].content, "caf\u{0065}\u{0301} au lait.");
    }

    #[test]
    fn test_extractor_failure_is_wrapped() {
        let processor = DocumentProcessor::with_extractor(Arc::new(FailingExtractor));
        let err = processor.process_bytes("bad.pdf", b"%PDF-1.7").unwrap_err();
        assert!(matches!(err, Error::Processing { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_process_file_missing() {
        let err = DocumentProcessor::new()
            .process_file("/nonexistent/paper.pdf")
            .unwrap_err();
        match err {
            Error::Processing { filename, source } => {
                assert_eq!(filename, "paper.pdf");
                assert!(matches!(*source, Error::Io(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
