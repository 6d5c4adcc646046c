//! Heading classification rules.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::model::SectionType;

/// Built-in heading rules, in priority order.
///
/// The `title` rule is deliberately loose: any capitalised line without
/// `.`, `!` or `?` matches, so plain headings such as "Introduction" are
/// classified as titles. Keep it first; reordering changes every
/// downstream section boundary.
pub const STANDARD_RULES: &[(SectionType, &str)] = &[
    (SectionType::Title, r"^[A-Z][^.!?]*$"),
    (SectionType::Abstract, r"(?i)^(abstract|summary)"),
    (
        SectionType::Introduction,
        r"(?i)^(introduction|1\.\s*introduction)",
    ),
    (SectionType::Methodology, r"(?i)^(methodology|methods?|2\.\s*method)"),
    (SectionType::Results, r"(?i)^(results?|3\.\s*results?)"),
    (
        SectionType::Conclusion,
        r"(?i)^(conclusion|conclusions?|4\.\s*conclusion)",
    ),
    (SectionType::References, r"(?i)^(references?|bibliography)"),
    (SectionType::Section, r"^\d+\.?\s+[A-Z]"),
];

/// Lines that terminate an abstract block.
pub const ABSTRACT_END_PATTERNS: &[&str] = &[
    r"^\d+\.",
    r"(?i)^(introduction|1\.)",
    r"(?i)^(keywords?|key\s+words?)",
];

/// A single heading rule: a section type and the pattern that detects it.
#[derive(Debug, Clone)]
pub struct HeadingRule {
    section_type: SectionType,
    pattern: Regex,
}

impl HeadingRule {
    /// Compile a rule.
    pub fn new(section_type: SectionType, pattern: &str) -> Result<Self> {
        Ok(Self {
            section_type,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Section type this rule assigns.
    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    /// Source pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Test the rule against a line.
    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Immutable, ordered table of heading rules.
///
/// Build once and pass by reference; the table is `Send + Sync` and is
/// never mutated after construction.
#[derive(Debug, Clone)]
pub struct SectionRules {
    rules: Vec<HeadingRule>,
    abstract_end: Vec<Regex>,
}

impl SectionRules {
    /// The built-in rule table.
    pub fn standard() -> Self {
        Self::from_table(STANDARD_RULES).expect("built-in section rules must compile")
    }

    /// Process-wide shared instance of the built-in table.
    pub fn shared() -> &'static SectionRules {
        static RULES: OnceLock<SectionRules> = OnceLock::new();
        RULES.get_or_init(SectionRules::standard)
    }

    /// Build a table from `(type, pattern)` pairs, tested in the given order.
    ///
    /// Abstract end markers use [`ABSTRACT_END_PATTERNS`].
    pub fn from_table(table: &[(SectionType, &str)]) -> Result<Self> {
        let rules = table
            .iter()
            .map(|(section_type, pattern)| HeadingRule::new(*section_type, pattern))
            .collect::<Result<Vec<_>>>()?;
        let abstract_end = compile_all(ABSTRACT_END_PATTERNS)?;

        Ok(Self {
            rules,
            abstract_end,
        })
    }

    /// Replace the abstract end markers.
    pub fn with_abstract_end(mut self, patterns: &[&str]) -> Result<Self> {
        self.abstract_end = compile_all(patterns)?;
        Ok(self)
    }

    /// Classify a line. The first matching rule wins; `None` means body text.
    pub fn classify(&self, line: &str) -> Option<SectionType> {
        self.rules
            .iter()
            .find(|rule| rule.matches(line))
            .map(HeadingRule::section_type)
    }

    /// Test a line against the rule for one specific type, ignoring priority.
    ///
    /// Returns `false` when the table has no rule for that type.
    pub fn matches(&self, section_type: SectionType, line: &str) -> bool {
        self.rules
            .iter()
            .filter(|rule| rule.section_type == section_type)
            .any(|rule| rule.matches(line))
    }

    /// Whether a line terminates an abstract block.
    pub fn is_abstract_end(&self, line: &str) -> bool {
        self.abstract_end.iter().any(|re| re.is_match(line))
    }

    /// The rules, in priority order.
    pub fn rules(&self) -> &[HeadingRule] {
        &self.rules
    }
}

impl Default for SectionRules {
    fn default() -> Self {
        Self::standard()
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(Into::into))
        .collect()
}
