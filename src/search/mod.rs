//! Academic paper search seam.
//!
//! The HTTP client for the paper search service sits behind
//! [`PaperSearch`]. This module holds the request/response records, query
//! string construction, and the heuristics that decide whether a user
//! question should be routed to paper search at all.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Upper bound the search service accepts for `max_results`.
pub const MAX_RESULTS_LIMIT: u32 = 2000;

/// Words that mark a question as being about published papers.
const PAPER_KEYWORDS: [&str; 5] = [
    "arxiv",
    "paper",
    "research paper",
    "scientific paper",
    "publication",
];

/// Lead-in phrases stripped from a question to get the search terms.
const SEARCH_PREFIXES: [&str; 4] = [
    "find papers about",
    "search for papers on",
    "arxiv papers about",
    "research papers on",
];

/// Metadata for one paper returned by the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Paper title
    pub title: String,
    /// Paper abstract as published by the service
    pub summary: String,
    /// Author names
    pub authors: Vec<String>,
    /// Publication timestamp as reported by the service
    pub published: String,
    /// Service identifier (e.g. `2101.00001v1`)
    pub arxiv_id: String,
    /// Link to the PDF
    pub pdf_link: String,
    /// Link to the abstract page
    pub html_link: String,
    /// Subject categories
    pub categories: Vec<String>,
    /// Journal reference, when the paper has been published
    pub journal_ref: Option<String>,
}

impl Paper {
    /// Trim title and summary, which the service pads with whitespace.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();
        self.journal_ref = self
            .journal_ref
            .map(|j| j.trim().to_string())
            .filter(|j| !j.is_empty());
        self
    }
}

/// A paper search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Index of the first result (0-based)
    pub start: u32,
    /// Maximum number of results
    pub max_results: u32,
}

impl SearchRequest {
    /// Create a request for the first ten results.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: 0,
            max_results: 10,
        }
    }

    /// Set the index of the first result.
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Set the maximum number of results, capped at [`MAX_RESULTS_LIMIT`].
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.min(MAX_RESULTS_LIMIT);
        self
    }

    /// Service query expression: multi-word queries become exact phrases.
    pub fn search_query(&self) -> String {
        let query = self.query.trim();
        if query.contains(' ') {
            format!("all:\"{}\"", query)
        } else {
            format!("all:{}", query)
        }
    }
}

/// Result of a paper search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Whether the search succeeded
    pub success: bool,
    /// Total matches reported by the service
    pub total_results: u32,
    /// Returned papers
    pub papers: Vec<Paper>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    /// Successful response.
    pub fn success(total_results: u32, papers: Vec<Paper>) -> Self {
        Self {
            success: true,
            total_results,
            papers,
            error: None,
        }
    }

    /// Failed response carrying an error message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            total_results: 0,
            papers: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Trait for paper search providers.
pub trait PaperSearch: Send + Sync {
    /// Get a human-readable name of this provider.
    fn name(&self) -> &str;

    /// Run a search.
    fn search(&self, request: &SearchRequest) -> Result<SearchResponse>;
}

/// Whether a question should be answered with help from paper search.
pub fn is_paper_query(query: &str) -> bool {
    let lower = query.to_lowercase();
    PAPER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Search terms for a question: the lowercased question with the first
/// known lead-in phrase (and everything before it) removed.
pub fn search_terms(query: &str) -> String {
    let lower = query.to_lowercase();
    SEARCH_PREFIXES
        .iter()
        .find_map(|prefix| {
            lower
                .split_once(prefix)
                .map(|(_, rest)| rest.split(prefix).next().unwrap_or("").trim().to_string())
        })
        .unwrap_or(lower)
}
