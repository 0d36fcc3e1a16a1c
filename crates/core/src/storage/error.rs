use thiserror::Error;

/// Errors that can occur during key-value store operations.
///
/// Each variant is one failure class. The HTTP layer may still collapse them
/// into a single status code, but handlers and tests can tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Access denied: {0}")]
    Forbidden(String),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl StoreError {
    /// The underlying store message, without the class prefix.
    pub fn message(&self) -> &str {
        match self {
            StoreError::NotFound(msg)
            | StoreError::Forbidden(msg)
            | StoreError::BackendUnavailable(msg)
            | StoreError::Validation(msg) => msg,
        }
    }

    /// Returns true when repeating the same call may succeed.
    ///
    /// Only backend failures (throttling, network, internal errors) qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::BackendUnavailable(_))
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
