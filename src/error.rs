//! Error types for the readably library.

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ReadabilityError>;

/// Errors that can occur while setting up or running an extraction.
///
/// Most failure modes of the pipeline itself are null returns rather than
/// errors: exceeding the element ceiling, finding no candidate, malformed
/// JSON-LD and unresolvable URLs are all swallowed by design.
#[derive(Error, Debug)]
pub enum ReadabilityError {
    /// Failed to parse the HTML document
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Invalid base URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Document structure is missing required elements
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// JSON-LD parsing error
    #[error("JSON-LD parsing error: {0}")]
    JsonLdError(String),

    /// Maximum element limit exceeded
    #[error("Maximum element limit exceeded: {0}")]
    MaxElementsExceeded(usize),

    /// No article content could be extracted
    #[error("No article content found in document")]
    NoContentFound,

    /// General error
    #[error("Extraction error: {0}")]
    Other(String),
}
