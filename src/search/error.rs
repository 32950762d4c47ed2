//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur during search operations
///
/// Every variant keeps the message reported by the engine or the transport.
/// Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Index existence check or creation failed
    #[error("Failed to ensure index: {0}")]
    Provisioning(String),

    /// Document upsert failed
    #[error("Failed to index user: {0}")]
    Indexing(String),

    /// Document deletion failed (including unknown ids)
    #[error("Failed to delete user: {0}")]
    Deletion(String),

    /// Query was rejected or could not be executed
    #[error("Failed to {operation}: {message}")]
    Query { operation: String, message: String },

    /// Engine could not be reached or answered with an unexpected status
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Request or response body could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SearchError {
    pub(crate) fn query(operation: &str, err: impl std::fmt::Display) -> Self {
        SearchError::Query {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<elasticsearch::Error> for SearchError {
    fn from(err: elasticsearch::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            _ => AppError::Search(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_names_operation() {
        let err = SearchError::query("search text", "index_not_found_exception");
        assert_eq!(
            err.to_string(),
            "Failed to search text: index_not_found_exception"
        );
    }

    #[test]
    fn test_conversion_into_app_error() {
        let app: AppError = SearchError::InvalidConfiguration("node".into()).into();
        assert!(matches!(app, AppError::Configuration(_)));

        let app: AppError = SearchError::Deletion("not found".into()).into();
        assert!(matches!(app, AppError::Search(ref m) if m.contains("not found")));
    }
}
