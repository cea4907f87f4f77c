//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in the Server                        │
//! │                                                                     │
//! │  Handler returns Result<T, ApiError>                                │
//! │         │                                                           │
//! │         ▼                                                           │
//! │  ValidationError ──► 400 VALIDATION_ERROR                           │
//! │  CoreError::*NotFound ──► 404 NOT_FOUND                             │
//! │  InsufficientStock / NotPayable /                                   │
//! │  ExceedsBalance / ScheduleSumMismatch ──► 409 (business conflict)   │
//! │  DbError (unexpected) ──► 500, details logged, generic body         │
//! │         │                                                           │
//! │         ▼                                                           │
//! │  { "code": "EXCEEDS_BALANCE", "message": "..." }                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Expected failures carry their message through; unexpected ones are
//! logged and replaced with a generic body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use fiado_core::{CoreError, ValidationError};
use fiado_db::{DbError, LedgerError};

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// { "code": "INSUFFICIENT_STOCK", "message": "Insufficient stock for ..." }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404).
    NotFound,

    /// Input validation failed (400).
    ValidationError,

    /// A line item asked for more than available stock (409).
    InsufficientStock,

    /// Payment attempted against a settled cash sale (409).
    NotPayable,

    /// Payment amount above the outstanding balance (409).
    ExceedsBalance,

    /// Supplied installment schedule does not sum to the financed
    /// amount (409).
    ScheduleMismatch,

    /// Entity still referenced by sales and cannot be deleted (409).
    Conflict,

    /// Database operation failed (500).
    DatabaseError,

    /// Internal server error (500).
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock
            | ErrorCode::NotPayable
            | ErrorCode::ExceedsBalance
            | ErrorCode::ScheduleMismatch
            | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
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

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core (business rule) errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::CustomerNotFound(_)
            | CoreError::ProductNotFound(_)
            | CoreError::SaleNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::MissingInstallments => ErrorCode::ValidationError,
            CoreError::ScheduleSumMismatch { .. } => ErrorCode::ScheduleMismatch,
            CoreError::NotPayable { .. } => ErrorCode::NotPayable,
            CoreError::ExceedsBalance { .. } => ErrorCode::ExceedsBalance,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::validation(format!(
                "{} '{}' already exists",
                field, value
            )),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::StillReferenced { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::Internal, "Internal error")
            }
        }
    }
}

/// Converts ledger errors (the union) to API errors.
impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Domain(e) => e.into(),
            LedgerError::Db(e) => e.into(),
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

    #[test]
    fn test_business_errors_map_to_conflict() {
        let err: ApiError = CoreError::ExceedsBalance {
            requested_cents: 100,
            balance_cents: 50,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ExceedsBalance);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = CoreError::SaleNotFound("x".into()).into();
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unexpected_db_error_hides_details() {
        let err: ApiError = DbError::QueryFailed("secret table names".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("secret"));
    }
}
