//! Evaluation metric mentions (accuracy, F1, ...) in retrieved passages.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Source;

const CONTEXT_CHARS: usize = 200;

const METRIC_PATTERNS: [(&str, &str); 7] = [
    ("accuracy", r"(?i)accuracy[:\s]*([0-9.]+%?)"),
    ("f1", r"(?i)f1[-\s]?score[:\s]*([0-9.]+%?)"),
    ("precision", r"(?i)precision[:\s]*([0-9.]+%?)"),
    ("recall", r"(?i)recall[:\s]*([0-9.]+%?)"),
    ("auc", r"(?i)auc[:\s]*([0-9.]+%?)"),
    ("rmse", r"(?i)rmse[:\s]*([0-9.]+%?)"),
    ("mae", r"(?i)mae[:\s]*([0-9.]+%?)"),
];

/// One metric value found in a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMatch {
    /// Metric name (e.g. `accuracy`)
    pub metric: String,
    /// Value as written (e.g. `93.5%`)
    pub value: String,
    /// Start of the passage the value came from
    pub context: String,
}

/// Metric values with the passage each came from.
///
/// `sources[i]` is the passage of `metrics[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Found values
    pub metrics: Vec<MetricMatch>,
    /// Passage of each value
    pub sources: Vec<Source>,
}

fn compiled() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        METRIC_PATTERNS
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(pattern).expect("built-in metric patterns must compile"),
                )
            })
            .collect()
    })
}

/// All `(metric, value)` pairs mentioned in a text, grouped by metric.
pub fn find_metrics(text: &str) -> Vec<(&'static str, String)> {
    compiled()
        .iter()
        .flat_map(|(name, re)| {
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(move |m| (*name, m.as_str().to_string()))
        })
        .collect()
}

/// The first 200 characters of a passage, with an ellipsis when cut.
pub fn context_snippet(text: &str) -> String {
    match text.char_indices().nth(CONTEXT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_metrics() {
        let found = find_metrics("Our model reaches Accuracy: 93.5% and an F1-score of 0.91; recall 0.88.");
        assert_eq!(
            found,
            vec![
                ("accuracy", "93.5%".to_string()),
                ("recall", "0.88.".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_f1_score() {
        let found = find_metrics("f1 score: 0.91");
        assert_eq!(found, vec![("f1", "0.91".to_string())]);
    }

    #[test]
    fn test_no_metrics() {
        assert!(find_metrics("widgets survived all trials").is_empty());
    }

    #[test]
    fn test_context_snippet() {
        assert_eq!(context_snippet("short"), "short");
        let long = "é".repeat(250);
        let snippet = context_snippet(&long);
        assert_eq!(snippet.chars().count(), 203);
        assert!(snippet.ends_with("..."));
        assert_eq!(context_snippet(&"a".repeat(200)), "a".repeat(200));
    }
}
