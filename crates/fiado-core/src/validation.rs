//! # Validation Module
//!
//! Request-shape validation for the ledger operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: serde (typed DTOs)                                        │
//! │  ├── unknown payment modes fail enum deserialization                │
//! │  └── unknown fields rejected (deny_unknown_fields)                  │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - field and cross-field rules                 │
//! │  ├── positive quantities, non-negative prices                       │
//! │  └── mode-specific rules (credit schedules, down payments)          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: SQLite constraints                                        │
//! │  ├── CHECK (quantity_on_hand >= 0), CHECK (quantity > 0)            │
//! │  └── UNIQUE (sale_id, seq), foreign keys                            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs before any transaction side effect.

use std::collections::HashSet;

use crate::error::{ValidationError, ValidationResult};
use crate::request::{CreateSaleRequest, PaymentRequest};
use crate::types::PaymentMode;
use crate::{MAX_INTEREST_RATE_BPS, MAX_ITEMS_PER_SALE, MAX_ITEM_QUANTITY};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a UUID string under the given field name.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a display name (product name, customer first name).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a line-item quantity: positive, bounded.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price/amount in cents that may be zero but never negative.
pub fn validate_non_negative(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an interest rate in basis points.
pub fn validate_interest_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_INTEREST_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "interestRateBps".to_string(),
            min: 0,
            max: MAX_INTEREST_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Operation Validators
// =============================================================================

/// Validates a sale-creation request's shape.
///
/// Existence checks (customer, products) belong to the transaction; this is
/// everything that can be rejected without touching storage.
pub fn validate_create_sale(req: &CreateSaleRequest) -> ValidationResult<()> {
    validate_uuid("customerId", &req.customer_id)?;

    if req.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if req.items.len() > MAX_ITEMS_PER_SALE {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ITEMS_PER_SALE as i64,
        });
    }

    for item in &req.items {
        validate_uuid("items.productId", &item.product_id)?;
        validate_quantity(item.quantity)?;
        validate_non_negative("items.unitPriceCents", item.unit_price_cents)?;
    }

    validate_interest_rate_bps(req.interest_rate_bps)?;
    validate_non_negative("downPaymentCents", req.down_payment_cents)?;

    match req.payment_mode {
        PaymentMode::Cash => {
            // Cash sales are born settled; a down payment could never be
            // applied to them.
            if req.down_payment_cents > 0 {
                return Err(ValidationError::NotAllowedForMode {
                    field: "downPaymentCents".to_string(),
                    mode: "cash".to_string(),
                });
            }
        }
        PaymentMode::Credit => {
            validate_schedule(req)?;
        }
    }

    Ok(())
}

/// Validates an explicitly supplied installment schedule: positive,
/// duplicate-free sequence numbers and non-negative amounts.
///
/// Gaps in the sequence are allowed; allocation orders by seq, not density.
fn validate_schedule(req: &CreateSaleRequest) -> ValidationResult<()> {
    let mut seen = HashSet::new();

    for inst in &req.installments {
        if inst.seq <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "installments.seq".to_string(),
            });
        }
        if !seen.insert(inst.seq) {
            return Err(ValidationError::Duplicate {
                field: "installments.seq".to_string(),
                value: inst.seq.to_string(),
            });
        }
        validate_non_negative("installments.amountCents", inst.amount_cents)?;
    }

    Ok(())
}

/// Validates a payment request's shape.
pub fn validate_payment(req: &PaymentRequest) -> ValidationResult<()> {
    if req.amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amountCents".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{InstallmentRequest, SaleItemRequest};
    use chrono::NaiveDate;

    const CUSTOMER: &str = "550e8400-e29b-41d4-a716-446655440000";
    const PRODUCT: &str = "550e8400-e29b-41d4-a716-446655440001";

    fn base_request(mode: PaymentMode) -> CreateSaleRequest {
        CreateSaleRequest {
            date: None,
            customer_id: CUSTOMER.to_string(),
            payment_mode: mode,
            interest_rate_bps: 0,
            items: vec![SaleItemRequest {
                product_id: PRODUCT.to_string(),
                quantity: 3,
                unit_price_cents: 12000,
            }],
            installments: vec![],
            installment_count: None,
            first_due_on: None,
            down_payment_cents: 0,
        }
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", CUSTOMER).is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_cash_sale_accepts_base_request() {
        assert!(validate_create_sale(&base_request(PaymentMode::Cash)).is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut req = base_request(PaymentMode::Cash);
        req.items.clear();
        assert!(matches!(
            validate_create_sale(&req),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_item_rejected() {
        let mut req = base_request(PaymentMode::Cash);
        req.items[0].quantity = 0;
        assert!(validate_create_sale(&req).is_err());
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let mut req = base_request(PaymentMode::Cash);
        req.items[0].unit_price_cents = -1;
        assert!(validate_create_sale(&req).is_err());
    }

    #[test]
    fn test_cash_down_payment_rejected() {
        let mut req = base_request(PaymentMode::Cash);
        req.down_payment_cents = 5000;
        assert!(matches!(
            validate_create_sale(&req),
            Err(ValidationError::NotAllowedForMode { .. })
        ));
    }

    #[test]
    fn test_duplicate_installment_seq_rejected() {
        let mut req = base_request(PaymentMode::Credit);
        let due = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        req.installments = vec![
            InstallmentRequest {
                seq: 1,
                due_on: due,
                amount_cents: 18000,
            },
            InstallmentRequest {
                seq: 1,
                due_on: due,
                amount_cents: 18000,
            },
        ];
        assert!(matches!(
            validate_create_sale(&req),
            Err(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_non_positive_installment_seq_rejected() {
        let mut req = base_request(PaymentMode::Credit);
        req.installments = vec![InstallmentRequest {
            seq: 0,
            due_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount_cents: 36000,
        }];
        assert!(validate_create_sale(&req).is_err());
    }

    #[test]
    fn test_validate_payment() {
        let ok = PaymentRequest {
            amount_cents: 50000,
            date: None,
        };
        assert!(validate_payment(&ok).is_ok());

        let zero = PaymentRequest {
            amount_cents: 0,
            date: None,
        };
        assert!(validate_payment(&zero).is_err());
    }
}
