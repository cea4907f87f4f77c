//! # Ledger Engine
//!
//! The transactional core: sale creation and payment application, each
//! running as one all-or-nothing SQLite transaction.
//!
//! ## Sale Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_sale(request)                                               │
//! │                                                                     │
//! │  0. validate shape + compute totals/schedule  (pure, no side effects)│
//! │  1. BEGIN                                                           │
//! │  2. customer exists?            ── no ──► rollback, CustomerNotFound│
//! │  3. insert header (totals = 0)                                      │
//! │  4. per item:                                                       │
//! │       reserve stock             ── short ─► rollback, Insufficient  │
//! │       insert line                           Stock (all decrements   │
//! │  5. cash   → implicit full payment          undone)                 │
//! │     credit → insert installments,                                   │
//! │              record any down payment                                │
//! │  6. update header totals                                            │
//! │  7. COMMIT                                                          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping an uncommitted `sqlx::Transaction` rolls it back, so every `?`
//! on the way out is a full rollback.
//!
//! Payment application loads the outstanding installments, lets the pure
//! planner in [`fiado_core::allocation`] slice the amount (oldest sequence
//! first), then executes the plan: one payment row per slice, installment
//! counters updated, sale balance reduced.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use fiado_core::allocation::{self, OutstandingInstallment, PaymentOutcome};
use fiado_core::request::{CreateSaleRequest, PaymentRequest, SaleItemRequest};
use fiado_core::schedule::{self, ScheduledInstallment};
use fiado_core::{validation, CoreError, Money, PaymentMode, ValidationError};

use crate::error::{DbError, DbResult};

// =============================================================================
// Errors
// =============================================================================

/// Errors from ledger operations: a business rule said no, or storage failed.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Db(err.into())
    }
}

impl From<fiado_core::ValidationError> for LedgerError {
    fn from(err: fiado_core::ValidationError) -> Self {
        LedgerError::Domain(err.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Results
// =============================================================================

/// Result of a successful sale creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSale {
    pub sale_id: String,
    pub total_cents: i64,
    /// Outstanding balance after creation: 0 for cash, the financed amount
    /// (total minus any down payment) for credit.
    pub balance_cents: i64,
}

// =============================================================================
// Ledger
// =============================================================================

/// The ledger engine. Cheap to clone; each operation acquires a connection
/// from the pool for the duration of its transaction and releases it on
/// every exit path.
#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Creates a new Ledger over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Ledger { pool }
    }

    /// Creates a sale atomically: header, line items, stock decrements, and
    /// either the implicit full payment (cash) or the installment schedule
    /// plus any down payment (credit).
    ///
    /// Any failure at any step leaves no trace: no sale, no lines, no stock
    /// change, no installments, no payments.
    pub async fn create_sale(&self, req: &CreateSaleRequest) -> LedgerResult<CreatedSale> {
        validation::validate_create_sale(req)?;

        let sale_date = req.date.unwrap_or_else(|| Utc::now().date_naive());
        let items_total = req.items_total();

        // Cash forces interest to zero; credit totals carry it.
        let (interest_rate_bps, total) = match req.payment_mode {
            PaymentMode::Cash => (0, items_total),
            PaymentMode::Credit => (
                req.interest_rate_bps,
                items_total.add_interest(req.interest_rate()),
            ),
        };

        // A down payment covering the whole total leaves nothing to
        // finance; that sale is a cash sale, not a credit one.
        let down_payment = req.down_payment();
        if down_payment.is_positive() && down_payment >= total {
            return Err(CoreError::Validation(ValidationError::OutOfRange {
                field: "downPaymentCents".to_string(),
                min: 0,
                max: total.cents() - 1,
            })
            .into());
        }

        let financed = schedule::financed_amount(total, down_payment);

        let installments = match req.payment_mode {
            PaymentMode::Cash => Vec::new(),
            PaymentMode::Credit => resolve_schedule(req, financed, sale_date)?,
        };

        let mut tx = self.pool.begin().await?;

        if !customer_exists(&mut tx, &req.customer_id).await? {
            return Err(CoreError::CustomerNotFound(req.customer_id.clone()).into());
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(sale_id = %sale_id, mode = ?req.payment_mode, "Inserting sale header");

        // Placeholder totals; finalized in step 6 once every line cleared.
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, sale_date, payment_mode,
                interest_rate_bps, total_cents, balance_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6)
            "#,
        )
        .bind(&sale_id)
        .bind(&req.customer_id)
        .bind(sale_date)
        .bind(req.payment_mode)
        .bind(interest_rate_bps)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (position, item) in req.items.iter().enumerate() {
            reserve_stock(&mut tx, &item.product_id, item.quantity).await?;
            insert_sale_item(&mut tx, &sale_id, position as i64, item).await?;
        }

        let balance = match req.payment_mode {
            PaymentMode::Cash => {
                // Born settled: one implicit payment for the full total.
                // A zero-total sale gets no row; the payments table only
                // accepts positive amounts.
                if total.is_positive() {
                    insert_payment(&mut tx, &sale_id, None, sale_date, total, now).await?;
                }
                Money::zero()
            }
            PaymentMode::Credit => {
                for inst in &installments {
                    insert_installment(&mut tx, &sale_id, inst).await?;
                }
                // Money tendered at sale time precedes the schedule, so it
                // ties to no installment; it leaves the balance at the
                // financed amount, keeping the balance equal to the sum of
                // outstanding installments from the first commit on.
                if down_payment.is_positive() {
                    insert_payment(&mut tx, &sale_id, None, sale_date, down_payment, now).await?;
                }
                financed
            }
        };

        sqlx::query("UPDATE sales SET total_cents = ?1, balance_cents = ?2 WHERE id = ?3")
            .bind(total.cents())
            .bind(balance.cents())
            .bind(&sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            mode = ?req.payment_mode,
            total = %total,
            items = req.items.len(),
            "Sale created"
        );

        Ok(CreatedSale {
            sale_id,
            total_cents: total.cents(),
            balance_cents: balance.cents(),
        })
    }

    /// Applies a payment against a credit sale's outstanding installments,
    /// oldest sequence first, in a single transaction.
    pub async fn apply_payment(
        &self,
        sale_id: &str,
        req: &PaymentRequest,
    ) -> LedgerResult<PaymentOutcome> {
        validation::validate_payment(req)?;

        let paid_on = req.date.unwrap_or_else(|| Utc::now().date_naive());
        let amount = req.amount();

        let mut tx = self.pool.begin().await?;

        let sale: Option<(PaymentMode, i64)> =
            sqlx::query_as("SELECT payment_mode, balance_cents FROM sales WHERE id = ?1")
                .bind(sale_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (mode, balance_cents) =
            sale.ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        if mode == PaymentMode::Cash {
            return Err(CoreError::NotPayable {
                sale_id: sale_id.to_string(),
            }
            .into());
        }

        let balance = Money::from_cents(balance_cents);
        if amount > balance {
            return Err(CoreError::ExceedsBalance {
                requested_cents: amount.cents(),
                balance_cents,
            }
            .into());
        }

        let outstanding = load_outstanding(&mut tx, sale_id).await?;
        let plan = allocation::allocate(&outstanding, amount);

        // Total outstanding across installments equals the balance by
        // construction; a shortfall here means corrupted state, not a bad
        // request.
        let applied: Money = plan.iter().map(|a| a.amount()).sum();
        if applied != amount {
            return Err(DbError::Internal(format!(
                "installments of sale {} cover {} of a {} payment",
                sale_id, applied, amount
            ))
            .into());
        }

        let now = Utc::now();
        for alloc in &plan {
            insert_payment(
                &mut tx,
                sale_id,
                Some(&alloc.installment_id),
                paid_on,
                alloc.amount(),
                now,
            )
            .await?;

            sqlx::query(
                r#"
                UPDATE installments
                SET paid_cents = paid_cents + ?1,
                    outstanding_cents = outstanding_cents - ?1
                WHERE id = ?2
                "#,
            )
            .bind(alloc.amount_cents)
            .bind(&alloc.installment_id)
            .execute(&mut *tx)
            .await?;
        }

        let new_balance = (balance - amount).clamp_non_negative();
        sqlx::query("UPDATE sales SET balance_cents = ?1 WHERE id = ?2")
            .bind(new_balance.cents())
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            amount = %amount,
            installments_hit = plan.len(),
            new_balance = %new_balance,
            "Payment applied"
        );

        Ok(PaymentOutcome {
            allocations: plan,
            new_balance_cents: new_balance.cents(),
        })
    }
}

// =============================================================================
// Schedule Resolution (pure)
// =============================================================================

/// Resolves the installment schedule for a credit sale: either the caller's
/// explicit schedule (validated to sum to the financed amount, to the cent)
/// or one generated from a requested count.
fn resolve_schedule(
    req: &CreateSaleRequest,
    financed: Money,
    sale_date: chrono::NaiveDate,
) -> Result<Vec<ScheduledInstallment>, CoreError> {
    if req.installments.is_empty() {
        let Some(count) = req.installment_count else {
            return Err(CoreError::MissingInstallments);
        };
        let first_due = req.first_due_on.unwrap_or(sale_date);
        return Ok(schedule::generate(financed, count, first_due));
    }

    let supplied: Money = req.installments.iter().map(|i| i.amount()).sum();
    if supplied != financed {
        return Err(CoreError::ScheduleSumMismatch {
            expected_cents: financed.cents(),
            supplied_cents: supplied.cents(),
        });
    }

    Ok(req
        .installments
        .iter()
        .map(|i| ScheduledInstallment {
            seq: i.seq,
            due_on: i.due_on,
            amount: i.amount(),
        })
        .collect())
}

// =============================================================================
// Transaction-Scoped Helpers
// =============================================================================
// Every helper takes the open transaction's connection; nothing below ever
// touches the pool directly.

/// The stock ledger: checks availability and decrements in one step inside
/// the caller's transaction. A failure here aborts the whole sale.
async fn reserve_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> LedgerResult<()> {
    let available: Option<i64> =
        sqlx::query_scalar("SELECT quantity_on_hand FROM products WHERE id = ?1")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

    let available = available.ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if available < quantity {
        return Err(CoreError::InsufficientStock {
            product_id: product_id.to_string(),
            available,
            requested: quantity,
        }
        .into());
    }

    sqlx::query(
        "UPDATE products SET quantity_on_hand = quantity_on_hand - ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    debug!(product_id = %product_id, quantity, available, "Stock reserved");
    Ok(())
}

async fn customer_exists(conn: &mut SqliteConnection, customer_id: &str) -> DbResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM customers WHERE id = ?1")
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(found.is_some())
}

async fn insert_sale_item(
    conn: &mut SqliteConnection,
    sale_id: &str,
    position: i64,
    item: &SaleItemRequest,
) -> LedgerResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_items (id, sale_id, product_id, position, quantity, unit_price_cents)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(sale_id)
    .bind(&item.product_id)
    .bind(position)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_installment(
    conn: &mut SqliteConnection,
    sale_id: &str,
    inst: &ScheduledInstallment,
) -> LedgerResult<()> {
    // paid starts at 0 and outstanding at the full amount; only the payment
    // allocator moves them afterwards.
    sqlx::query(
        r#"
        INSERT INTO installments (id, sale_id, seq, due_on, amount_cents, paid_cents, outstanding_cents)
        VALUES (?1, ?2, ?3, ?4, ?5, 0, ?5)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(sale_id)
    .bind(inst.seq)
    .bind(inst.due_on)
    .bind(inst.amount.cents())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_payment(
    conn: &mut SqliteConnection,
    sale_id: &str,
    installment_id: Option<&str>,
    paid_on: chrono::NaiveDate,
    amount: Money,
    now: chrono::DateTime<Utc>,
) -> LedgerResult<()> {
    sqlx::query(
        r#"
        INSERT INTO payments (id, sale_id, installment_id, paid_on, amount_cents, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(sale_id)
    .bind(installment_id)
    .bind(paid_on)
    .bind(amount.cents())
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn load_outstanding(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> LedgerResult<Vec<OutstandingInstallment>> {
    let rows: Vec<(String, i64, i64)> = sqlx::query_as(
        r#"
        SELECT id, seq, outstanding_cents
        FROM installments
        WHERE sale_id = ?1 AND outstanding_cents > 0
        ORDER BY seq ASC
        "#,
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, seq, outstanding_cents)| OutstandingInstallment {
            id,
            seq,
            outstanding: Money::from_cents(outstanding_cents),
        })
        .collect())
}
