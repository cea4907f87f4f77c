//! # Installment Schedule Generator
//!
//! Splits a financed amount into N dated installments that always sum back
//! to the financed amount exactly, to the cent.
//!
//! ## How the remainder is handled
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  financed = $1100.00, count = 3                                     │
//! │                                                                     │
//! │  base = round_half_up(110000 / 3) = 36667                          │
//! │                                                                     │
//! │  seq 1: $366.67   due first_due                                     │
//! │  seq 2: $366.67   due first_due + 1 month                           │
//! │  seq 3: $366.66   due first_due + 2 months  ← absorbs remainder    │
//! │         ───────                                                     │
//! │         $1100.00  always reconstructs exactly                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure functions only; nothing here touches a transaction.

use chrono::{Months, NaiveDate};

use crate::money::Money;

/// One generated schedule entry, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledInstallment {
    /// 1-based sequence number.
    pub seq: i64,
    pub due_on: NaiveDate,
    pub amount: Money,
}

/// Generates an installment schedule for a financed amount.
///
/// - `count` is clamped to at least 1.
/// - Every installment except the last is `round_half_up(financed / count)`;
///   the last absorbs the rounding remainder so the schedule sums exactly
///   to `financed`.
/// - Installment 1 is due at `first_due`; installment k at `first_due`
///   plus k−1 calendar months, with the day of month clamped when the
///   target month is shorter (Jan 31 → Feb 28/29).
pub fn generate(financed: Money, count: u32, first_due: NaiveDate) -> Vec<ScheduledInstallment> {
    let count = count.max(1) as i64;
    let base = financed.divided_by(count);
    let last = financed - base.multiply_quantity(count - 1);

    (0..count)
        .map(|i| ScheduledInstallment {
            seq: i + 1,
            due_on: add_months(first_due, i as u32),
            amount: if i == count - 1 { last } else { base },
        })
        .collect()
}

/// The portion of a sale total left to finance after a down payment,
/// floored at zero.
pub fn financed_amount(total: Money, down_payment: Money) -> Money {
    (total - down_payment).clamp_non_negative()
}

/// Calendar month addition with day-of-month clamping.
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    if months == 0 {
        return date;
    }
    // checked_add_months only fails past NaiveDate::MAX (year ~262143)
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

// =============================================================================
// Unit Tests
// =============================================================================
