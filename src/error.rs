//! Error types for docmind library.

use std::io;
use thiserror::Error;

/// Result type alias for docmind operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing, indexing, or querying documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The document yielded no pages.
    #[error("Document has no pages")]
    EmptyDocument,

    /// A heading rule pattern failed to compile.
    #[error("Invalid section rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Processing a document failed; the cause is kept as the source.
    #[error("Error processing document {filename}: {source}")]
    Processing {
        /// Name of the document being processed
        filename: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The uploaded file was rejected before processing.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Vector index failure.
    #[error("Index error: {0}")]
    Index(String),

    /// Answer model failure.
    #[error("Answer generation error: {0}")]
    Answerer(String),

    /// Paper search failure.
    #[error("Paper search error: {0}")]
    Search(String),

    /// No document is registered under this id.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error as a processing failure for the named document.
    pub fn processing(filename: impl Into<String>, source: Error) -> Self {
        Error::Processing {
            filename: filename.into(),
            source: Box::new(source),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document has no pages");

        let err = Error::DocumentNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Document not found: abc");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_processing_keeps_source() {
        let err = Error::processing("paper.pdf", Error::UnknownFormat);
        assert_eq!(
            err.to_string(),
            "Error processing document paper.pdf: Unknown file format: not a valid PDF"
        );
        let source = err.source().expect("source preserved");
        assert_eq!(source.to_string(), "Unknown file format: not a valid PDF");
    }

    #[test]
    fn test_regex_error_conversion() {
        let err: Error = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }
}
