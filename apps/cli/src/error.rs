//! # CLI Error Type
//!
//! Unified error type for the `stride` commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Stride                                 │
//! │                                                                         │
//! │  Cart rule violations (StockExceeded, AddFailed, ...)                  │
//! │      └──► Notifier → stderr, exit code 1. Never an ApiError.           │
//! │                                                                         │
//! │  Infrastructure failures before the cart exists                        │
//! │      DbError ──────────┐                                                │
//! │      LookupError ──────┼──► ApiError { code, message } ──► stderr      │
//! │      reqwest::Error ───┘                                  exit code 2  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--json`, the error is printed as:
//! ```json
//! { "code": "DATABASE_ERROR", "message": "Database connection failed" }
//! ```

use serde::Serialize;
use stride_core::LookupError;
use stride_db::DbError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Storefront API could not be reached or answered garbage
    StorefrontUnavailable,

    /// Bad configuration (paths, URLs)
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::CheckViolation(message) => ApiError::new(
                ErrorCode::ValidationError,
                format!("Constraint violated: {}", message),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts catalog/stock lookup errors (product listing only).
impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(id) => ApiError::not_found("Product", &id.to_string()),
            LookupError::Unavailable(reason) => {
                ApiError::new(ErrorCode::StorefrontUnavailable, reason)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use stride_core::ProductId;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::new(ErrorCode::StorefrontUnavailable, "timeout");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "STOREFRONT_UNAVAILABLE");
        assert_eq!(json["message"], "timeout");
    }

    #[test]
    fn test_query_failure_hides_details() {
        let err = ApiError::from(DbError::QueryFailed("near \"SELEC\": syntax error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_lookup_not_found() {
        let err = ApiError::from(LookupError::NotFound(ProductId(7)));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: 7");
    }
}
