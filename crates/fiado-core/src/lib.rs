//! # fiado-core: Pure Business Logic for the Fiado Ledger
//!
//! This crate is the **heart** of fiado. It contains the sale/credit ledger
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Fiado Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  apps/server (HTTP/JSON)                      │ │
//! │  │   POST /api/sales   POST /api/sales/:id/payments   CRUD       │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │               ★ fiado-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────────────────┐ │ │
//! │  │  │  money  │ │  types  │ │ schedule │ │ allocation         │ │ │
//! │  │  │  cents  │ │  Sale   │ │ generate │ │ oldest-seq-first   │ │ │
//! │  │  │  rules  │ │  ...    │ │          │ │ planning           │ │ │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └────────────────────┘ │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐ │
//! │  │                  fiado-db (SQLite layer)                      │ │
//! │  │      transactions, repositories, migrations, ledger engine    │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Sale, Installment, ...)
//! - [`money`] - Integer-cent money with round-half-up division
//! - [`request`] - Validated request DTOs per ledger operation
//! - [`schedule`] - Installment schedule generator (remainder-safe)
//! - [`allocation`] - Payment allocation planner (oldest sequence first)
//! - [`validation`] - Request-shape validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; dates are inputs, never
//!    read from a clock here
//! 2. **No I/O**: database and network access are FORBIDDEN in this crate
//! 3. **Integer Money**: all monetary values are cents (i64); one rounding
//!    rule (half up) applied at every division
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod error;
pub mod money;
pub mod request;
pub mod schedule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale.
///
/// Keeps transaction sizes bounded; a corner-store ticket never comes close.
pub const MAX_ITEMS_PER_SALE: usize = 100;

/// Maximum quantity of a single line item.
///
/// Catches fat-finger entries (1000 instead of 10) before they hit stock.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum interest rate in basis points (1000%).
///
/// Wide on purpose: the rate is an input, not a policy, and installment
/// sellers in high-inflation markets run rates well past 100%.
pub const MAX_INTEREST_RATE_BPS: u32 = 100_000;
