//! Error types for ClauseIQ.
//!
//! A single error enum covers every failure category in the workspace:
//! configuration, I/O, upstream text extraction, unknown documents,
//! malformed queries and storage. Heuristic non-matches in field extraction
//! and audit rules are not errors and never appear here.

use thiserror::Error;

/// Unified error type for ClauseIQ.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Upstream text extraction failed; ingestion of this document is aborted
    #[error("Extraction failed for document '{document}': {reason}")]
    Extraction { document: String, reason: String },

    /// Unknown document identifier
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Empty or non-text query handed to the ranker
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// Document store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Build an extraction error for a named document.
    pub fn extraction(document: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Extraction {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Extraction { .. } => "extraction",
            AppError::NotFound(_) => "not_found",
            AppError::MalformedQuery(_) => "malformed_query",
            AppError::Storage(_) => "storage",
            AppError::Serialization(_) => "serialization",
            AppError::Other(_) => "other",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_names_document() {
        let err = AppError::extraction("lease.pdf", "encrypted");
        assert_eq!(err.kind(), "extraction");
        assert_eq!(
            err.to_string(),
            "Extraction failed for document 'lease.pdf': encrypted"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
