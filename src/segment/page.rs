//! Page segmentation.

use super::rules::SectionRules;
use crate::model::{Section, SectionType};

/// Split one page of text into sections.
///
/// Blank lines are skipped. A named heading closes the open section (even
/// when it has no body yet) and opens a new one; the opening is recorded as
/// an empty-content record carrying the detected type, and the body is
/// recorded later under the same title with the generic `section` type.
/// Body text before any heading is collected under `"Page N Content"`.
pub fn extract_sections(rules: &SectionRules, page_text: &str, page_number: u32) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title: Option<String> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in page_text.split('\n').map(str::trim) {
        if line.is_empty() {
            continue;
        }

        match rules.classify(line) {
            Some(kind) if kind.is_named() => {
                if let Some(title) = current_title.take() {
                    sections.push(Section::new(
                        title,
                        join_content(&buffer),
                        page_number,
                        SectionType::Section,
                    ));
                }

                buffer.clear();
                current_title = Some(line.to_string());
                sections.push(Section::heading(line, page_number, kind));
            }
            _ => {
                current_title.get_or_insert_with(|| page_content_title(page_number));
                buffer.push(line);
            }
        }
    }

    if let Some(title) = current_title {
        if !buffer.is_empty() {
            sections.push(Section::new(
                title,
                join_content(&buffer),
                page_number,
                SectionType::Section,
            ));
        }
    }

    sections
}

/// Placeholder title for body text that precedes any heading on a page.
pub fn page_content_title(page_number: u32) -> String {
    format!("Page {} Content", page_number)
}

fn join_content(lines: &[&str]) -> String {
    lines.join(" ").trim().to_string()
}
