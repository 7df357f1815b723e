//! Error types module
//!
//! This module provides the core error types used throughout the docvault
//! application. All errors are unified under the `AppError` enum, which can
//! represent database, storage, authorization, and validation failures.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the core crate can be used without a database dependency.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like a wrong password or unknown id
    Debug,
    /// Warning level - for recoverable issues like an unreachable upstream
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many attempts: {0}")]
    TooManyAttempts(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Record not found".to_string()),
            SqlxError::PoolTimedOut => {
                AppError::UpstreamUnavailable("Database pool timed out".to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::PayloadTooLarge(_) => 413,
            AppError::TooManyAttempts(_) => 429,
            AppError::UpstreamUnavailable(_) => 503,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::TooManyAttempts(_) => "TOO_MANY_ATTEMPTS",
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable(_) | AppError::TooManyAttempts(_)
        )
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::UpstreamUnavailable(_) => Some("Retry after a short delay"),
            AppError::TooManyAttempts(_) => Some("Wait before retrying"),
            AppError::PayloadTooLarge(_) => Some("Upload a smaller file"),
            _ => None,
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Internal failures are opaque to clients; details stay in the logs.
            AppError::Database(_) | AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "An internal error occurred. Please try again.".to_string()
            }
            AppError::Storage(_) | AppError::UpstreamUnavailable(_) => {
                "Service temporarily unavailable. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Storage(_)
                | AppError::Internal(_)
                | AppError::InternalWithSource { .. }
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::NotFound(_)
            | AppError::Unauthorized(_)
            | AppError::Forbidden(_)
            | AppError::InvalidInput(_)
            | AppError::PayloadTooLarge(_)
            | AppError::TooManyAttempts(_)
            | AppError::Conflict(_) => LogLevel::Debug,
            AppError::UpstreamUnavailable(_) => LogLevel::Warn,
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("x".into()).http_status_code(), 404);
        assert_eq!(AppError::Unauthorized("x".into()).http_status_code(), 401);
        assert_eq!(AppError::Forbidden("x".into()).http_status_code(), 403);
        assert_eq!(AppError::Conflict("x".into()).http_status_code(), 409);
        assert_eq!(AppError::PayloadTooLarge("x".into()).http_status_code(), 413);
        assert_eq!(AppError::TooManyAttempts("x".into()).http_status_code(), 429);
        assert_eq!(
            AppError::UpstreamUnavailable("x".into()).http_status_code(),
            503
        );
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = AppError::Internal("pool exploded at /var/lib/docvault".into());
        assert!(!err.client_message().contains("/var/lib"));
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_expected_outcomes_log_at_debug() {
        assert_eq!(
            AppError::Unauthorized("wrong password".into()).log_level(),
            LogLevel::Debug
        );
        assert_eq!(
            AppError::NotFound("no such document".into()).log_level(),
            LogLevel::Debug
        );
    }

    #[test]
    fn test_upstream_unavailable_is_recoverable() {
        let err = AppError::UpstreamUnavailable("storage unreachable".into());
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Warn);
        assert!(err.suggested_action().is_some());
    }
}
