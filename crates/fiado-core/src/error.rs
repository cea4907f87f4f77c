//! # Error Types
//!
//! Domain-specific error types for fiado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  fiado-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  fiado-db errors (separate crate)                                   │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── LedgerError      - CoreError ∪ DbError for ledger operations   │
//! │                                                                     │
//! │  server errors (apps/server)                                        │
//! │  └── ApiError         - What clients see (serialized JSON)          │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → LedgerError → ApiError         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations in the ledger.
///
/// Every variant is an expected, local failure mode: caught at the request
/// boundary, translated to a client-facing message, and the surrounding
/// transaction rolls back without corrupting persisted state.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Referenced sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// A line item requests more units than are on hand.
    ///
    /// Aborts the entire sale-creation transaction; no partial stock
    /// decrement survives.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Credit sale submitted without an installment schedule.
    #[error("Credit sale requires at least one installment")]
    MissingInstallments,

    /// Supplied schedule does not sum to the financed amount.
    #[error("Installment schedule sums to {supplied_cents} cents, expected {expected_cents}")]
    ScheduleSumMismatch {
        expected_cents: i64,
        supplied_cents: i64,
    },

    /// Payment attempted against a cash sale (settled in full at creation).
    #[error("Sale {sale_id} was paid in full at creation and accepts no payments")]
    NotPayable { sale_id: String },

    /// Payment amount greater than the sale's outstanding balance.
    #[error("Payment of {requested_cents} cents exceeds outstanding balance of {balance_cents}")]
    ExceedsBalance {
        requested_cents: i64,
        balance_cents: i64,
    },

    /// Input validation failure (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Rejected before any transaction side effect, with enough detail for the
/// caller to fix the request.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g. malformed UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value where uniqueness is required.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },

    /// Field is not applicable for the request's payment mode.
    #[error("{field} is not allowed for {mode} sales")]
    NotAllowedForMode { field: String, mode: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "p-77".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product p-77: available 3, requested 5"
        );

        let err = CoreError::ExceedsBalance {
            requested_cents: 70000,
            balance_cents: 60000,
        };
        assert!(err.to_string().contains("70000"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customerId".to_string(),
        };
        assert_eq!(err.to_string(), "customerId is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
