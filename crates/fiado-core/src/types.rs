//! # Domain Types
//!
//! Core domain types for the fiado ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐         │
//! │  │   Product     │   │     Sale      │   │  Installment  │         │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │         │
//! │  │ id (UUID)     │   │ id (UUID)     │   │ sale_id (FK)  │         │
//! │  │ price_cents   │   │ payment_mode  │   │ seq (1-based) │         │
//! │  │ quantity_on_  │   │ total_cents   │   │ amount_cents  │         │
//! │  │   hand        │   │ balance_cents │   │ outstanding   │         │
//! │  └───────────────┘   └───────┬───────┘   └───────────────┘         │
//! │                             │                                      │
//! │  ┌───────────────┐   ┌──────┴────────┐   ┌───────────────┐         │
//! │  │   Customer    │   │   SaleItem    │   │    Payment    │         │
//! │  │  referenced   │   │  price frozen │   │  append-only  │         │
//! │  │  by sales     │   │  at sale time │   │  ledger fact  │         │
//! │  └───────────────┘   └───────────────┘   └───────────────┘         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Interest Rate
// =============================================================================

/// Interest rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%; integer bps keeps interest math exact in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRate(u32);

impl InterestRate {
    /// Creates an interest rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        InterestRate(bps)
    }

    /// Creates an interest rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        InterestRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero interest rate.
    #[inline]
    pub const fn zero() -> Self {
        InterestRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for InterestRate {
    fn default() -> Self {
        InterestRate::zero()
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How a sale is paid.
///
/// Cash sales are settled in full at creation (one implicit payment for the
/// total). Credit sales carry an installment schedule and an outstanding
/// balance paid down over time.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Cash,
    Credit,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional free-form detail.
    pub description: Option<String>,

    /// Purchase cost in cents.
    pub cost_cents: i64,

    /// Sale price in cents (suggested; line items freeze their own price).
    pub price_cents: i64,

    /// On-hand stock. Mutated only by the stock ledger during sale
    /// creation; never negative.
    pub quantity_on_hand: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer referenced by sales.
///
/// Display attributes only; the ledger cares about nothing beyond identity.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// "Last, First" display name, degrading to first name alone.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{}, {}", last, self.first_name),
            None => self.first_name.clone(),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header.
///
/// Created once, atomically, with all its line items and (for credit) its
/// installments. Only `balance_cents` is mutated afterwards, by the payment
/// allocator.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    /// Calendar date of the sale (no time component, no zone drift).
    pub sale_date: NaiveDate,
    pub payment_mode: PaymentMode,
    /// Interest in basis points; always 0 for cash sales.
    pub interest_rate_bps: u32,
    /// Grand total: items total, plus interest for credit sales.
    pub total_cents: i64,
    /// Outstanding amount. 0 for cash sales; starts at total for credit.
    pub balance_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    #[inline]
    pub fn interest_rate(&self) -> InterestRate {
        InterestRate::from_bps(self.interest_rate_bps)
    }

    /// True once nothing remains outstanding.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.balance_cents == 0
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// The unit price is frozen at sale time, decoupled from the product's
/// current price.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// 0-based line order within the sale.
    pub position: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// `quantity × unit price`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Installment
// =============================================================================

/// One scheduled partial obligation of a credit sale.
///
/// Invariant: `paid_cents + outstanding_cents == amount_cents` at all times.
/// Mutated only by the payment allocator; never deleted.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: String,
    pub sale_id: String,
    /// 1-based sequence number, unique per sale. Allocation order is by
    /// sequence, not due date.
    pub seq: i64,
    pub due_on: NaiveDate,
    pub amount_cents: i64,
    pub paid_cents: i64,
    pub outstanding_cents: i64,
}

impl Installment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn outstanding(&self) -> Money {
        Money::from_cents(self.outstanding_cents)
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.outstanding_cents == 0
    }
}

// =============================================================================
// Payment
// =============================================================================

/// An immutable record of money received against a sale.
///
/// `installment_id` is None for payments tied to no installment: the
/// implicit full payment of a cash sale and the down payment of a credit
/// sale. Append-only: once written, never modified or deleted.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    pub installment_id: Option<String>,
    pub paid_on: NaiveDate,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A sale header joined with its customer's display name, for listings.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub sale_date: NaiveDate,
    pub payment_mode: PaymentMode,
    pub interest_rate_bps: u32,
    pub total_cents: i64,
    pub balance_cents: i64,
}

/// Full read-back of a sale: header, lines, schedule, payment history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub sale: Sale,
    pub customer_name: String,
    pub items: Vec<SaleItem>,
    pub installments: Vec<Installment>,
    pub payments: Vec<Payment>,
}

// =============================================================================
// Unit Tests
// =============================================================================
