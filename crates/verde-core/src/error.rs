//! Unified error types for the verde ecosystem
//!
//! This module provides a common error type [`VerdeError`] that can represent
//! errors from any part of the system. Request handlers map the variants onto
//! HTTP status codes at the API boundary.

use thiserror::Error;

/// Unified error type for all verde operations.
///
/// Validation and lookup failures carry the user-facing message verbatim;
/// everything else wraps the underlying cause as a string.
#[derive(Error, Debug)]
pub enum VerdeError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request validation errors (empty country, non-positive consumption)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No data for the requested country/year combination
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unexpected failures while computing or rendering a result
    #[error("Calculation error: {0}")]
    Calculation(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using VerdeError.
pub type VerdeResult<T> = Result<T, VerdeError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for VerdeError {
    fn from(err: anyhow::Error) -> Self {
        VerdeError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for VerdeError {
    fn from(s: String) -> Self {
        VerdeError::Other(s)
    }
}

impl From<&str> for VerdeError {
    fn from(s: &str) -> Self {
        VerdeError::Other(s.to_string())
    }
}

// Table-engine errors surface during per-request computation
impl From<polars::error::PolarsError> for VerdeError {
    fn from(err: polars::error::PolarsError) -> Self {
        VerdeError::Calculation(err.to_string())
    }
}
