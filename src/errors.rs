//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the screening engine. Refresh errors are
//! non-fatal by design: a failed fetch or parse is logged and the prior
//! snapshot is retained, so no error here ever reaches an in-flight query.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from refresh, configuration, and API layers
//! - **Output**: Structured error types with context
//! - **Error Categories**: Transport, Parse, Configuration, Internal
//!
//! ## Usage
//! ```rust
//! use watchlist_screening::errors::{Result, ScreeningError};
//!
//! fn resolve_source(identifier: &str) -> Result<()> {
//!     Err(ScreeningError::ConfigurationFailure {
//!         source_id: identifier.to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ScreeningError>;

/// Error types for the watchlist screening engine
#[derive(Debug, Error)]
pub enum ScreeningError {
    /// Network or HTTP error during refresh; prior snapshot is retained
    #[error("transport failure fetching watchlist from '{source_id}': {details}")]
    TransportFailure { source_id: String, details: String },

    /// Remote returned a non-200 status; prior snapshot is retained
    #[error("unexpected status {status} fetching watchlist from '{source_id}'")]
    UnexpectedStatus { source_id: String, status: u16 },

    /// Malformed upstream document; prior snapshot is retained
    #[error("failed to parse watchlist document from '{source_id}': {details}")]
    ParseFailure { source_id: String, details: String },

    /// Source identifier is neither a URL nor a readable path; refresh skipped
    #[error("unrecognized watchlist source '{source_id}': not a URL or readable path")]
    ConfigurationFailure { source_id: String },

    /// Configuration file or value errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Internal system errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ScreeningError {
    /// Check if the error is recoverable (the next scheduled refresh may succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScreeningError::TransportFailure { .. }
                | ScreeningError::UnexpectedStatus { .. }
                | ScreeningError::ParseFailure { .. }
        )
    }

    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            ScreeningError::TransportFailure { .. } | ScreeningError::UnexpectedStatus { .. } => {
                "transport"
            }
            ScreeningError::ParseFailure { .. } => "parse",
            ScreeningError::ConfigurationFailure { .. }
            | ScreeningError::Config { .. }
            | ScreeningError::ValidationFailed { .. } => "configuration",
            ScreeningError::Internal { .. } => "internal",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for ScreeningError {
    fn from(err: std::io::Error) -> Self {
        ScreeningError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<reqwest::Error> for ScreeningError {
    fn from(err: reqwest::Error) -> Self {
        ScreeningError::TransportFailure {
            source_id: err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScreeningError {
    fn from(err: serde_json::Error) -> Self {
        ScreeningError::ParseFailure {
            source_id: "unknown".to_string(),
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = ScreeningError::ConfigurationFailure {
            source_id: "ftp://nope".to_string(),
        };
        assert_eq!(err.category(), "configuration");
        assert!(!err.is_recoverable());

        let err = ScreeningError::UnexpectedStatus {
            source_id: "https://example.com/list".to_string(),
            status: 500,
        };
        assert_eq!(err.category(), "transport");
        assert!(err.is_recoverable());
    }
}
