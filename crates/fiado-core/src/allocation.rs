//! # Payment Allocation Planner
//!
//! Pure planning half of the payment allocator: given a sale's outstanding
//! installments and a payment amount, decide how much lands on each
//! installment. The transactional half ([`fiado-db`]'s ledger) executes the
//! plan row by row.
//!
//! ## Ordering
//! Installments are consumed oldest obligation first, by ascending sequence
//! number. Sequence is authoritative even if sequence and due date ever
//! diverge.
//!
//! ```text
//! payment $500.00 against:
//!   seq 1  outstanding $366.67  ──►  $366.67 applied, settled
//!   seq 2  outstanding $366.67  ──►  $133.33 applied, $233.34 left
//!   seq 3  outstanding $366.66  ──►  untouched
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// An installment with money still owed, as loaded for allocation.
#[derive(Debug, Clone)]
pub struct OutstandingInstallment {
    pub id: String,
    pub seq: i64,
    pub outstanding: Money,
}

/// One slice of a payment applied to one installment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub installment_id: String,
    pub seq: i64,
    pub amount_cents: i64,
}

impl Allocation {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Result of applying a payment to a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub allocations: Vec<Allocation>,
    pub new_balance_cents: i64,
}

/// Plans the distribution of `amount` across `installments`.
///
/// `installments` must already be ordered by ascending sequence number and
/// contain only entries with outstanding > 0. Each installment absorbs
/// `min(outstanding, remaining)`; planning stops as soon as the amount is
/// exhausted.
///
/// When `amount` does not exceed the total outstanding, the returned slices
/// sum to exactly `amount`. The caller enforces that precondition via the
/// sale balance check and treats any shortfall as a fatal inconsistency.
pub fn allocate(installments: &[OutstandingInstallment], amount: Money) -> Vec<Allocation> {
    let mut remaining = amount;
    let mut allocations = Vec::new();

    for inst in installments {
        if !remaining.is_positive() {
            break;
        }
        let applied = inst.outstanding.min(remaining);
        if !applied.is_positive() {
            continue;
        }
        allocations.push(Allocation {
            installment_id: inst.id.clone(),
            seq: inst.seq,
            amount_cents: applied.cents(),
        });
        remaining -= applied;
    }

    allocations
}

// =============================================================================
// Unit Tests
// =============================================================================
