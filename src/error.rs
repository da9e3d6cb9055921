//! Error types for the PDF tools library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF tools library
#[derive(Error, Debug)]
pub enum Error {
    /// The input bytes are not a readable PDF
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// The codec failed while writing output bytes
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Operation invoked without anything to operate on
    #[error("Nothing to do: {0}")]
    NoOperationTarget(String),

    /// Compression report requested for a zero-byte original
    #[error("Cannot compute size reduction: original document is 0 bytes")]
    DivisionGuard,

    /// Scale factor is not a positive finite number
    #[error("Invalid scale factor: {0} (must be a positive number)")]
    InvalidScale(f64),

    /// Unknown compression level name
    #[error("Invalid compression level: {0} (expected low, medium or high)")]
    InvalidCompressionLevel(String),

    /// Page index outside the document
    #[error("Page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Page selection was parsed against a document of a different length
    #[error("Page selection was built for {expected} pages but document has {actual}")]
    StaleSelection { expected: usize, actual: usize },

    /// A loaded document has objects of the wrong shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}
