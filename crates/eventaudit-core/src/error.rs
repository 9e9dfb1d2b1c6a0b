use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that can occur while auditing an account
#[derive(Error, Debug)]
pub enum AuditError {
    /// Caller identity could not be established
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The caller lacks permission for an operation
    #[error("access denied: {operation} on {resource}")]
    AccessDenied {
        /// API operation that was refused
        operation: String,
        /// Resource the operation targeted
        resource: String,
    },

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Throttled after the SDK exhausted its retries
    #[error("throttled: {operation}")]
    Throttled {
        /// API operation that was throttled
        operation: String,
    },

    /// Service returned an error response
    #[error("{operation} failed ({code}): {message}")]
    Api {
        /// API operation that failed
        operation: String,
        /// Service error code
        code: String,
        /// Error message from the service
        message: String,
    },

    /// Request could not be dispatched or timed out
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuditError {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
