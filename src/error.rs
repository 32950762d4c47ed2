use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search engine errors (provisioning, writes, queries)
    #[error("Search error: {0}")]
    Search(String),

    /// Session/cache store errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Message bus errors
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// Authentication errors (missing token, unknown session)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Search(_) => "SEARCH_ERROR",
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::Messaging(_) => "MESSAGING_ERROR",
            AppError::Authentication(_) => "AUTHENTICATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error means the caller is not allowed through
    pub fn is_access_denied(&self) -> bool {
        matches!(self, AppError::Authentication(_))
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Conversion from redis::RedisError
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Cache(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
