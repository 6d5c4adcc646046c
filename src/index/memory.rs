//! In-process section index using bag-of-words cosine similarity.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::{Error, Result};

use super::{IndexHit, IndexRecord, SectionIndex};

/// A stored record with its precomputed term vector.
#[derive(Debug)]
struct Entry {
    record: IndexRecord,
    terms: HashMap<String, f32>,
    norm: f32,
}

/// Thread-safe in-memory [`SectionIndex`].
///
/// Writes take an exclusive lock, so a document's records appear and
/// disappear as a unit.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    entries: RwLock<Vec<Entry>>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every stored record, in insertion order.
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|e| e.record.id.clone()).collect())
            .unwrap_or_default()
    }
}

impl SectionIndex for MemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    fn add(&self, records: Vec<IndexRecord>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        let mut seen: HashSet<&str> = entries.iter().map(|e| e.record.id.as_str()).collect();
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(Error::Index(format!("Duplicate record id: {}", record.id)));
            }
        }

        entries.extend(records.into_iter().map(|record| {
            let terms = term_vector(&record.text);
            let norm = vector_norm(&terms);
            Entry {
                record,
                terms,
                norm,
            }
        }));

        Ok(())
    }

    fn remove_document(&self, file_id: &str) -> Result<usize> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|e| e.record.metadata.file_id != file_id);
        Ok(before - entries.len())
    }

    fn query(
        &self,
        text: &str,
        n_results: usize,
        filter: Option<&[String]>,
    ) -> Result<Vec<IndexHit>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        let query_terms = term_vector(text);
        let query_norm = vector_norm(&query_terms);

        let mut hits: Vec<IndexHit> = entries
            .iter()
            .filter(|e| filter.map_or(true, |ids| ids.contains(&e.record.metadata.file_id)))
            .map(|e| IndexHit {
                id: e.record.id.clone(),
                text: e.record.text.clone(),
                metadata: e.record.metadata.clone(),
                distance: 1.0 - cosine_similarity(&query_terms, query_norm, &e.terms, e.norm),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(n_results);
        Ok(hits)
    }

    fn document_texts(&self, file_id: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .iter()
            .filter(|e| e.record.metadata.file_id == file_id)
            .map(|e| e.record.text.clone())
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }
}

fn poisoned() -> Error {
    Error::Index("memory index lock poisoned".into())
}

/// Lowercased alphanumeric term frequencies.
fn term_vector(text: &str) -> HashMap<String, f32> {
    let mut terms = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        *terms.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
    }
    terms
}

fn vector_norm(terms: &HashMap<String, f32>) -> f32 {
    terms.values().map(|v| v * v).sum::<f32>().sqrt()
}

fn cosine_similarity(
    a: &HashMap<String, f32>,
    norm_a: f32,
    b: &HashMap<String, f32>,
    norm_b: f32,
) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f32 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SectionMetadata;
    use crate::model::SectionType;

    fn record(id: &str, file_id: &str, text: &str) -> IndexRecord {
        IndexRecord {
            id: id.to_string(),
            text: text.to_string(),
            metadata: SectionMetadata {
                file_id: file_id.to_string(),
                filename: format!("{}.pdf", file_id),
                title: "T".into(),
                section_title: "S".into(),
                section_type: SectionType::Section,
                page_number: 1,
                document_title: "T".into(),
            },
        }
    }

    #[test]
    fn test_query_ranks_by_similarity() {
        let index = MemoryIndex::new();
        index
            .add(vec![
                record("a_0", "a", "widgets break under heavy load"),
                record("a_1", "a", "the weather was pleasant"),
                record("b_0", "b", "Widgets survive heavy load tests"),
            ])
            .unwrap();

        let hits = index.query("widgets heavy load", 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.id != "a_1"));
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[0].relevance() > 0.0);
    }

    #[test]
    fn test_query_filter() {
        let index = MemoryIndex::new();
        index
            .add(vec![
                record("a_0", "a", "widgets"),
                record("b_0", "b", "widgets"),
            ])
            .unwrap();

        let filter = vec!["b".to_string()];
        let hits = index.query("widgets", 5, Some(&filter)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.file_id, "b");
    }

    #[test]
    fn test_duplicate_ids_rejected_atomically() {
        let index = MemoryIndex::new();
        index.add(vec![record("a_0", "a", "one")]).unwrap();

        let result = index.add(vec![record("a_1", "a", "two"), record("a_0", "a", "dup")]);
        assert!(matches!(result, Err(Error::Index(_))));
        assert_eq!(index.len(), 1);
        assert_eq!(index.ids(), vec!["a_0".to_string()]);
    }

    #[test]
    fn test_remove_document() {
        let index = MemoryIndex::new();
        index
            .add(vec![
                record("a_0", "a", "one"),
                record("a_1", "a", "two"),
                record("b_0", "b", "three"),
            ])
            .unwrap();

        assert_eq!(index.remove_document("a").unwrap(), 2);
        assert_eq!(index.remove_document("a").unwrap(), 0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.document_texts("b").unwrap(), vec!["three".to_string()]);
        assert!(index.document_texts("a").unwrap().is_empty());
    }

    #[test]
    fn test_empty_query_has_max_distance() {
        let index = MemoryIndex::new();
        index.add(vec![record("a_0", "a", "widgets")]).unwrap();
        let hits = index.query("", 5, None).unwrap();
        assert_eq!(hits[0].distance, 1.0);
        assert!(!index.is_empty());
    }
}
