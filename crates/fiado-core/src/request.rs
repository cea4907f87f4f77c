//! # Request Types
//!
//! Validated request schemas for the ledger operations.
//!
//! One typed struct per operation, replacing the loose request bodies of the
//! system this design came from. Unknown payment modes fail enum
//! deserialization; unknown fields are rejected outright
//! (`deny_unknown_fields`); numeric ranges are checked by
//! [`crate::validation`] before any persistence call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{InterestRate, PaymentMode};

// =============================================================================
// Sale Creation
// =============================================================================

/// Request body for creating a sale.
///
/// ## Credit schedules
/// A credit sale needs an installment schedule. The caller either supplies
/// `installments` explicitly, or supplies `installment_count` (+ optionally
/// `first_due_on`) and lets the server generate an even schedule via
/// [`crate::schedule::generate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSaleRequest {
    /// Sale date; defaults to today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,

    pub customer_id: String,

    pub payment_mode: PaymentMode,

    /// Interest in basis points (1000 = 10%). Forced to 0 for cash sales.
    #[serde(default)]
    pub interest_rate_bps: u32,

    pub items: Vec<SaleItemRequest>,

    /// Explicit installment schedule (credit only).
    #[serde(default)]
    pub installments: Vec<InstallmentRequest>,

    /// Number of installments to generate when no explicit schedule is
    /// supplied (credit only).
    #[serde(default)]
    pub installment_count: Option<u32>,

    /// Due date of the first generated installment; defaults to the sale
    /// date. Later installments fall on successive calendar months.
    #[serde(default)]
    pub first_due_on: Option<NaiveDate>,

    /// Up-front amount tendered at sale time (credit only). Recorded with
    /// the sale as a payment tied to no installment; the schedule covers
    /// only the remaining financed amount.
    #[serde(default)]
    pub down_payment_cents: i64,
}

impl CreateSaleRequest {
    #[inline]
    pub fn interest_rate(&self) -> InterestRate {
        InterestRate::from_bps(self.interest_rate_bps)
    }

    #[inline]
    pub fn down_payment(&self) -> Money {
        Money::from_cents(self.down_payment_cents)
    }

    /// Sum of `quantity × unit price` over all line items.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleItemRequest::line_total).sum()
    }
}

/// One line item of a sale-creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaleItemRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleItemRequest {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// One installment of an explicitly supplied credit schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InstallmentRequest {
    /// 1-based sequence number, unique within the schedule.
    pub seq: i64,
    pub due_on: NaiveDate,
    pub amount_cents: i64,
}

impl InstallmentRequest {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Payment Application
// =============================================================================

/// Request body for applying a payment to a credit sale.
///
/// No idempotency key is modeled: two identical requests create two distinct
/// payments. Callers must not blind-retry after a timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentRequest {
    pub amount_cents: i64,

    /// Payment date; defaults to today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl PaymentRequest {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
