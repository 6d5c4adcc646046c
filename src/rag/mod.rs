//! Retrieval-augmented question answering.
//!
//! [`RagEngine`] retrieves passages from a [`SectionIndex`], optionally
//! adds paper search results, builds a prompt, and asks an [`Answerer`].

mod metrics;
pub mod prompt;

pub use metrics::{context_snippet, find_metrics, MetricMatch, MetricsReport};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::{index_records, IndexHit, SectionIndex};
use crate::model::Document;
use crate::search::{is_paper_query, search_terms, Paper, PaperSearch, SearchRequest, SearchResponse};

/// Answer returned when neither the index nor paper search produced context.
pub const NO_CONTEXT_ANSWER: &str =
    "I couldn't find any relevant information in the uploaded documents or Arxiv papers.";

/// Answer returned when the model produced empty text.
pub const EMPTY_ANSWER: &str = "I couldn't generate a response.";

/// Summary returned for unknown or empty documents.
pub const NO_SUMMARY_CONTENT: &str = "Document not found or has no content.";

/// Summary returned when the model produced empty text.
pub const EMPTY_SUMMARY: &str = "Could not generate summary.";

/// Relevance of the first paper search result; each later one scores 0.05 less.
const PAPER_BASE_RELEVANCE: f32 = 0.95;
const PAPER_RELEVANCE_STEP: f32 = 0.05;

/// Trait for the generative answer model.
pub trait Answerer: Send + Sync {
    /// Get a human-readable name of this model.
    fn name(&self) -> &str;

    /// Generate text for a prompt.
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Retrieval settings.
#[derive(Debug, Clone)]
pub struct RagOptions {
    /// Passages retrieved per question
    pub top_k: usize,

    /// Paper search results added per question
    pub paper_results: u32,

    /// Passages scanned for metric mentions
    pub metric_top_k: usize,

    /// Whether paper-related questions trigger paper search
    pub paper_search: bool,
}

impl RagOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retrieved passages.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the number of paper search results.
    pub fn with_paper_results(mut self, paper_results: u32) -> Self {
        self.paper_results = paper_results;
        self
    }

    /// Set the number of passages scanned for metrics.
    pub fn with_metric_top_k(mut self, metric_top_k: usize) -> Self {
        self.metric_top_k = metric_top_k;
        self
    }

    /// Enable or disable paper search.
    pub fn with_paper_search(mut self, enabled: bool) -> Self {
        self.paper_search = enabled;
        self
    }
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            paper_results: 3,
            metric_top_k: 10,
            paper_search: true,
        }
    }
}

/// A question, optionally restricted to some documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language question
    pub query: String,
    /// Document ids to search; `None` or empty searches everything
    #[serde(default)]
    pub document_ids: Option<Vec<String>>,
}

impl QueryRequest {
    /// Question over all documents.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            document_ids: None,
        }
    }

    /// Restrict the question to some documents.
    pub fn with_documents(mut self, ids: Vec<String>) -> Self {
        self.document_ids = Some(ids);
        self
    }

    fn filter(&self) -> Option<&[String]> {
        self.document_ids.as_deref().filter(|ids| !ids.is_empty())
    }
}

/// Where a piece of context came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Document file name, or `Arxiv: <title>` for papers
    pub filename: String,
    /// Section heading
    pub section_title: String,
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Similarity to the question
    pub relevance_score: f32,
    /// Paper id, for paper search results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
    /// Paper abstract page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    /// Paper PDF
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_link: Option<String>,
}

impl Source {
    /// Source for a retrieved passage.
    pub fn from_hit(hit: &IndexHit) -> Self {
        Self {
            filename: hit.metadata.filename.clone(),
            section_title: hit.metadata.section_title.clone(),
            page_number: hit.metadata.page_number,
            relevance_score: hit.relevance(),
            arxiv_id: None,
            html_link: None,
            pdf_link: None,
        }
    }

    /// Source for a paper search result.
    pub fn from_paper(paper: &Paper, relevance_score: f32) -> Self {
        Self {
            filename: format!("Arxiv: {}", paper.title),
            section_title: "Summary".to_string(),
            page_number: 1,
            relevance_score,
            arxiv_id: Some(paper.arxiv_id.clone()),
            html_link: Some(paper.html_link.clone()),
            pdf_link: Some(paper.pdf_link.clone()),
        }
    }

    /// Whether this source is a paper search result.
    pub fn is_paper(&self) -> bool {
        self.arxiv_id.is_some()
    }
}

/// An answer with its sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Answer text
    pub answer: String,
    /// Context sources, paper results first
    pub sources: Vec<Source>,
    /// Mean relevance of the sources (0 when there are none)
    pub confidence: f32,
}

impl QueryResponse {
    /// Response without sources.
    pub fn empty(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Mean relevance score of the sources, 0 when there are none.
pub fn confidence(sources: &[Source]) -> f32 {
    if sources.is_empty() {
        return 0.0;
    }
    sources.iter().map(|s| s.relevance_score).sum::<f32>() / sources.len() as f32
}

/// Retrieval-augmented answering over a section index.
pub struct RagEngine {
    index: Arc<dyn SectionIndex>,
    answerer: Arc<dyn Answerer>,
    paper_search: Option<Arc<dyn PaperSearch>>,
    options: RagOptions,
}

impl RagEngine {
    /// Create an engine without paper search.
    pub fn new(index: Arc<dyn SectionIndex>, answerer: Arc<dyn Answerer>) -> Self {
        Self {
            index,
            answerer,
            paper_search: None,
            options: RagOptions::default(),
        }
    }

    /// Attach a paper search provider.
    pub fn with_paper_search(mut self, search: Arc<dyn PaperSearch>) -> Self {
        self.paper_search = Some(search);
        self
    }

    /// Set retrieval options.
    pub fn with_options(mut self, options: RagOptions) -> Self {
        self.options = options;
        self
    }

    /// Retrieval options.
    pub fn options(&self) -> &RagOptions {
        &self.options
    }

    /// The underlying index.
    pub fn index(&self) -> &dyn SectionIndex {
        self.index.as_ref()
    }

    /// Index every content-bearing section of a document, returning the
    /// number of records stored.
    pub fn add_document(&self, doc: &Document) -> Result<usize> {
        let records = index_records(doc);
        let count = records.len();
        self.index.add(records)?;
        log::debug!("Indexed {} records for {}", count, doc.file_id);
        Ok(count)
    }

    /// Remove a document's records from the index.
    pub fn remove_document(&self, file_id: &str) -> Result<usize> {
        self.index.remove_document(file_id)
    }

    /// Answer a question.
    pub fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        let (paper_contexts, mut sources) =
            if self.paper_search.is_some()
                && self.options.paper_search
                && is_paper_query(&request.query)
            {
                self.paper_context(&request.query)
            } else {
                (Vec::new(), Vec::new())
            };

        let hits = self
            .index
            .query(&request.query, self.options.top_k, request.filter())?;

        let mut context_parts = Vec::with_capacity(hits.len() + 1);
        if !paper_contexts.is_empty() {
            context_parts.push(prompt::papers_section(&paper_contexts));
        }
        for (i, hit) in hits.iter().enumerate() {
            context_parts.push(prompt::passage_context(i, hit));
            sources.push(Source::from_hit(hit));
        }

        if context_parts.is_empty() {
            return Ok(QueryResponse::empty(NO_CONTEXT_ANSWER));
        }

        let context = context_parts.join("\n\n");
        let answer = self
            .answerer
            .generate(&prompt::answer_prompt(&context, &request.query))?;
        let answer = if answer.is_empty() {
            EMPTY_ANSWER.to_string()
        } else {
            answer
        };

        let confidence = confidence(&sources);
        Ok(QueryResponse {
            answer,
            sources,
            confidence,
        })
    }

    /// Paper search context blocks and sources for a paper-related question.
    fn paper_context(&self, query: &str) -> (Vec<String>, Vec<Source>) {
        let request =
            SearchRequest::new(search_terms(query)).with_max_results(self.options.paper_results);
        let response = self.search_papers(&request);

        if !response.success {
            log::warn!(
                "Paper search failed: {}",
                response.error.as_deref().unwrap_or("unknown error")
            );
            return (Vec::new(), Vec::new());
        }

        response
            .papers
            .iter()
            .enumerate()
            .map(|(i, paper)| {
                let relevance = PAPER_BASE_RELEVANCE - i as f32 * PAPER_RELEVANCE_STEP;
                (
                    prompt::paper_context(i, paper),
                    Source::from_paper(paper, relevance),
                )
            })
            .unzip()
    }

    /// Run a paper search. Provider errors become failed responses.
    pub fn search_papers(&self, request: &SearchRequest) -> SearchResponse {
        let Some(ref provider) = self.paper_search else {
            return SearchResponse::failure("Paper search is not configured");
        };

        match provider.search(request) {
            Ok(response) if response.success => SearchResponse::success(
                response.total_results,
                response.papers.into_iter().map(Paper::normalized).collect(),
            ),
            Ok(response) => SearchResponse::failure(
                response
                    .error
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            ),
            Err(e) => SearchResponse::failure(format!("Error searching papers: {}", e)),
        }
    }

    /// Summarize one document from its indexed passages.
    pub fn summarize_document(&self, file_id: &str) -> Result<String> {
        let texts = self.index.document_texts(file_id)?;
        if texts.is_empty() {
            return Ok(NO_SUMMARY_CONTENT.to_string());
        }

        let summary = self
            .answerer
            .generate(&prompt::summary_prompt(&texts.join("\n\n")))?;
        if summary.is_empty() {
            Ok(EMPTY_SUMMARY.to_string())
        } else {
            Ok(summary)
        }
    }

    /// Find evaluation metric values in the passages closest to a question.
    pub fn extract_metrics(&self, query: &str) -> Result<MetricsReport> {
        let hits = self.index.query(query, self.options.metric_top_k, None)?;
        let mut report = MetricsReport::default();

        for hit in &hits {
            for (metric, value) in find_metrics(&hit.text) {
                report.metrics.push(MetricMatch {
                    metric: metric.to_string(),
                    value,
                    context: context_snippet(&hit.text),
                });
                report.sources.push(Source::from_hit(hit));
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use crate::model::{Section, SectionType};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingAnswerer {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingAnswerer {
        fn replying(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl Answerer for RecordingAnswerer {
        fn name(&self) -> &str {
            "recording"
        }

        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn doc(id: &str, body: &str) -> Document {
        Document::new(
            format!("{}.pdf", id),
            "Widgets",
            None,
            vec![Section::new("Page 1 Content", body, 1, SectionType::Section)],
            1,
        )
        .with_file_id(id)
    }

    fn engine(answerer: Arc<RecordingAnswerer>) -> RagEngine {
        RagEngine::new(Arc::new(MemoryIndex::new()), answerer)
    }

    #[test]
    fn test_query_without_context() {
        let answerer = Arc::new(RecordingAnswerer::replying("unused"));
        let engine = engine(answerer.clone());

        let response = engine.query(&QueryRequest::new("what broke?")).unwrap();
        assert_eq!(response.answer, NO_CONTEXT_ANSWER);
        assert!(response.sources.is_empty());
        assert_eq!(response.confidence, 0.0);
        assert!(answerer.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_query_builds_prompt_from_passages() {
        let answerer = Arc::new(RecordingAnswerer::replying("The widgets broke."));
        let engine = engine(answerer.clone());
        engine.add_document(&doc("d1", "widgets broke under load.")).unwrap();

        let response = engine.query(&QueryRequest::new("why did widgets break")).unwrap();
        assert_eq!(response.answer, "The widgets broke.");
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].filename, "d1.pdf");
        assert!((response.confidence - response.sources[0].relevance_score).abs() < 1e-6);

        let prompt = answerer.last_prompt();
        assert!(prompt.contains("Source 1 (from d1.pdf, Page 1 Content):\nwidgets broke under load."));
        assert!(prompt.contains("Question: why did widgets break"));
    }

    #[test]
    fn test_empty_answer_replaced() {
        let engine = engine(Arc::new(RecordingAnswerer::replying("")));
        engine.add_document(&doc("d1", "widgets.")).unwrap();
        let response = engine.query(&QueryRequest::new("widgets")).unwrap();
        assert_eq!(response.answer, EMPTY_ANSWER);
        assert_eq!(engine.summarize_document("d1").unwrap(), EMPTY_SUMMARY);
    }

    #[test]
    fn test_whitespace_answer_kept() {
        let engine = engine(Arc::new(RecordingAnswerer::replying(" \n")));
        engine.add_document(&doc("d1", "widgets.")).unwrap();
        let response = engine.query(&QueryRequest::new("widgets")).unwrap();
        assert_eq!(response.answer, " \n");
        assert_eq!(engine.summarize_document("d1").unwrap(), " \n");
    }

    #[test]
    fn test_paper_question_without_provider() {
        let answerer = Arc::new(RecordingAnswerer::replying("ok"));
        let engine = engine(answerer.clone());
        engine.add_document(&doc("d1", "widgets broke under load.")).unwrap();

        let response = engine
            .query(&QueryRequest::new("which paper covers widgets?"))
            .unwrap();
        assert_eq!(response.sources.len(), 1);
        assert!(!response.sources[0].is_paper());
        assert!(!answerer.last_prompt().contains("Arxiv Papers:"));
    }

    #[test]
    fn test_document_filter() {
        let engine = engine(Arc::new(RecordingAnswerer::replying("ok")));
        engine.add_document(&doc("d1", "widgets here.")).unwrap();
        engine.add_document(&doc("d2", "widgets there.")).unwrap();

        let request = QueryRequest::new("widgets").with_documents(vec!["d2".into()]);
        let response = engine.query(&request).unwrap();
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].filename, "d2.pdf");

        let request = QueryRequest::new("widgets").with_documents(Vec::new());
        assert_eq!(engine.query(&request).unwrap().sources.len(), 2);
    }

    #[test]
    fn test_confidence_mean() {
        let mut a = Source::from_paper(&Paper::default(), 0.9);
        let b = Source::from_paper(&Paper::default(), 0.5);
        assert!((confidence(&[a.clone(), b]) - 0.7).abs() < 1e-6);
        a.relevance_score = 0.2;
        assert!((confidence(&[a]) - 0.2).abs() < 1e-6);
        assert_eq!(confidence(&[]), 0.0);
    }

    #[test]
    fn test_summarize_document() {
        let answerer = Arc::new(RecordingAnswerer::replying("A summary."));
        let engine = engine(answerer.clone());
        engine.add_document(&doc("d1", "widgets broke.")).unwrap();

        assert_eq!(engine.summarize_document("d1").unwrap(), "A summary.");
        assert!(answerer.last_prompt().contains("widgets broke."));
        assert_eq!(engine.summarize_document("nope").unwrap(), NO_SUMMARY_CONTENT);
    }

    #[test]
    fn test_extract_metrics() {
        let engine = engine(Arc::new(RecordingAnswerer::replying("")));
        engine
            .add_document(&doc("d1", "The classifier accuracy: 91% on widgets."))
            .unwrap();

        let report = engine.extract_metrics("classifier accuracy").unwrap();
        assert_eq!(report.metrics.len(), 1);
        assert_eq!(report.metrics[0].metric, "accuracy");
        assert_eq!(report.metrics[0].value, "91%");
        assert_eq!(report.sources[0].filename, "d1.pdf");
    }

    #[test]
    fn test_search_papers_without_provider() {
        let engine = engine(Arc::new(RecordingAnswerer::default()));
        let response = engine.search_papers(&SearchRequest::new("widgets"));
        assert!(!response.success);
        assert!(response.error.is_some());
    }
}
