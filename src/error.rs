/// Unified error types for the concierge resolver
use thiserror::Error;

/// Main error type for identity resolution
///
/// None of these reach callers of `ProfileResolver::resolve`; the orchestrator
/// turns them into log lines and treats the failing source as empty.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Transport-level HTTP errors (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream call exceeded its deadline
    #[error("{source_name} lookup timed out after {timeout_ms}ms")]
    Timeout {
        source_name: &'static str,
        timeout_ms: u64,
    },

    /// Upstream answered with a non-success status
    #[error("{source_name} returned status {status}")]
    UpstreamStatus {
        source_name: &'static str,
        status: u16,
    },

    /// Upstream body did not match the expected schema
    #[error("Malformed response from {source_name}: {message}")]
    MalformedResponse {
        source_name: &'static str,
        message: String,
    },

    /// Configuration or input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResolverError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ResolverError::Http(_) => "http",
            ResolverError::Timeout { .. } => "timeout",
            ResolverError::UpstreamStatus { .. } => "status",
            ResolverError::MalformedResponse { .. } => "malformed",
            ResolverError::Validation(_) => "validation",
            ResolverError::Serialization(_) => "serialization",
            ResolverError::Io(_) => "io",
            ResolverError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for resolver operations
pub type ResolverResult<T> = Result<T, ResolverError>;
