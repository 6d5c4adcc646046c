//! Processing options and configuration.

use crate::extract::ErrorMode;

/// Options for turning a document into sections.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Error handling mode for page extraction
    pub error_mode: ErrorMode,

    /// Whether to segment pages in parallel
    pub parallel: bool,

    /// Normalize page text to Unicode NFC before segmentation
    pub normalize_unicode: bool,

    /// Maximum number of pages to segment (0 = unlimited)
    pub max_pages: u32,
}

impl ProcessOptions {
    /// Create new process options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages that fail extraction count as empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Limit the number of pages segmented.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            normalize_unicode: true,
            max_pages: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_options_builder() {
        let options = ProcessOptions::new()
            .lenient()
            .sequential()
            .with_unicode_normalization(false)
            .with_max_pages(20);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert!(!options.normalize_unicode);
        assert_eq!(options.max_pages, 20);
    }

    #[test]
    fn test_default_options() {
        let options = ProcessOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert!(options.normalize_unicode);
        assert_eq!(options.max_pages, 0);
    }
}
