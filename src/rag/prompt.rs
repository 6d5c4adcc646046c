//! Prompt construction for the answer model.

use crate::index::IndexHit;
use crate::search::Paper;

/// Context block for one retrieved passage (`index` is 0-based).
pub fn passage_context(index: usize, hit: &IndexHit) -> String {
    format!(
        "Source {} (from {}, {}):\n{}",
        index + 1,
        hit.metadata.filename,
        hit.metadata.section_title,
        hit.text
    )
}

/// Context block for one paper search result (`index` is 0-based).
pub fn paper_context(index: usize, paper: &Paper) -> String {
    format!(
        "Arxiv Paper {}: {}\nAuthors: {}\nSummary: {}\nLinks: {} | PDF: {}\n",
        index + 1,
        paper.title,
        paper.authors.join(", "),
        paper.summary,
        paper.html_link,
        paper.pdf_link
    )
}

/// Section of the context holding paper search results.
pub fn papers_section(papers: &[String]) -> String {
    format!("Arxiv Papers:\n{}", papers.join("\n\n"))
}

/// Prompt asking the model to answer strictly from the given context.
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following context from uploaded documents, please answer the user's question.
If the information is not available in the context, please say so clearly and explicitly.

Context:
{context}

Question: {question}

Instructions:
1. If the information is not found in the context, start your response with \"I cannot find information about [topic] in the provided documents.\" Be specific about what information is missing.
2. If you find relevant information, provide a comprehensive answer based on the context.
3. If you reference specific information, mention which document and section it came from.
4. Do not make up or infer information that is not explicitly stated in the context.
5. If the question is about a topic that is completely unrelated to the documents, clearly state that the documents do not contain information on that topic.
"
    )
}

/// Prompt asking the model to summarize a whole document.
pub fn summary_prompt(content: &str) -> String {
    format!(
        "Please provide a comprehensive summary of the following document:

{content}

Include:
1. Main topic and purpose
2. Key findings or results
3. Methodology (if applicable)
4. Conclusions
5. Important figures or data points mentioned"
    )
}
