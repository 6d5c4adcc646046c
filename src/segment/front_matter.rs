//! Title and abstract heuristics for the first page.

use super::rules::SectionRules;
use crate::model::SectionType;

/// Title returned when no first-page line qualifies.
pub const UNTITLED: &str = "Untitled Document";

const TITLE_SCAN_LINES: usize = 10;
const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 200;
const TITLE_STOP_WORDS: [&str; 4] = ["abstract", "introduction", "page", "doi"];

/// Lines taken after the heading when no end marker follows it.
const ABSTRACT_FALLBACK_LINES: usize = 10;
const ABSTRACT_MIN_CHARS: usize = 50;

/// Best-effort document title from the first page.
///
/// Returns the first of the first ten lines whose trimmed length is strictly
/// between 10 and 200 characters and which mentions none of "abstract",
/// "introduction", "page" or "doi".
pub fn extract_title(first_page_text: &str) -> String {
    first_page_text
        .split('\n')
        .take(TITLE_SCAN_LINES)
        .map(str::trim)
        .find(|line| is_title_candidate(line))
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn is_title_candidate(line: &str) -> bool {
    let len = line.chars().count();
    if len <= TITLE_MIN_CHARS || len >= TITLE_MAX_CHARS {
        return false;
    }
    let lower = line.to_lowercase();
    !TITLE_STOP_WORDS.iter().any(|word| lower.contains(word))
}

/// Abstract text from the first page, if any.
///
/// The block starts after the first abstract heading and runs up to the
/// next numbered heading, introduction, or keywords line (at most ten lines
/// when none follows). Blocks of 50 characters or fewer are rejected.
pub fn extract_abstract(rules: &SectionRules, first_page_text: &str) -> Option<String> {
    let lines: Vec<&str> = first_page_text.split('\n').collect();

    let mut start = None;
    let mut end = None;
    for (i, line) in lines.iter().enumerate() {
        match start {
            None if rules.matches(SectionType::Abstract, line) => start = Some(i + 1),
            Some(_) if rules.is_abstract_end(line) => {
                end = Some(i);
                break;
            }
            _ => {}
        }
    }

    let start = start?;
    let end = end
        .unwrap_or(start + ABSTRACT_FALLBACK_LINES)
        .min(lines.len());
    let text = lines[start..end].join(" ");
    let text = text.trim();

    if text.chars().count() > ABSTRACT_MIN_CHARS {
        Some(text.to_string())
    } else {
        None
    }
}
