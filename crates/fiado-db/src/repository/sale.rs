//! # Sale Repository
//!
//! Read-side database operations for sales.
//!
//! ## Why reads only?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  A sale is created once, atomically, with its items and (credit)    │
//! │  installments, then mutated only by payment allocation. Both paths  │
//! │  are multi-row transactions and live in the ledger engine; this     │
//! │  repository answers queries about committed state.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;

use crate::error::DbResult;
use fiado_core::{Installment, Payment, Sale, SaleDetail, SaleItem, SaleSummary};

/// Repository for sale read operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, sale_date, payment_mode,
                   interest_rate_bps, total_cents, balance_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists sale headers with customer names, newest first.
    pub async fn list(&self) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id,
                   s.customer_id,
                   CASE
                       WHEN c.last_name IS NULL OR c.last_name = ''
                       THEN c.first_name
                       ELSE c.last_name || ', ' || c.first_name
                   END AS customer_name,
                   s.sale_date,
                   s.payment_mode,
                   s.interest_rate_bps,
                   s.total_cents,
                   s.balance_cents
            FROM sales s
            JOIN customers c ON c.id = s.customer_id
            ORDER BY s.created_at DESC, s.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all line items for a sale, in line order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, position, quantity, unit_price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets all installments for a sale, ordered by sequence.
    pub async fn get_installments(&self, sale_id: &str) -> DbResult<Vec<Installment>> {
        let installments = sqlx::query_as::<_, Installment>(
            r#"
            SELECT id, sale_id, seq, due_on, amount_cents, paid_cents, outstanding_cents
            FROM installments
            WHERE sale_id = ?1
            ORDER BY seq
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(installments)
    }

    /// Gets all payments for a sale, oldest first.
    pub async fn get_payments(&self, sale_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, installment_id, paid_on, amount_cents, created_at
            FROM payments
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Gets total amount paid against a sale.
    pub async fn get_total_paid(&self, sale_id: &str) -> DbResult<i64> {
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(amount_cents) FROM payments WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(total.unwrap_or(0))
    }

    /// Full read-back of a sale: header, customer name, items, installments
    /// and payment history.
    pub async fn detail(&self, sale_id: &str) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(sale_id).await? else {
            return Ok(None);
        };

        let customer_name: String = sqlx::query_scalar(
            r#"
            SELECT CASE
                       WHEN last_name IS NULL OR last_name = ''
                       THEN first_name
                       ELSE last_name || ', ' || first_name
                   END
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(&sale.customer_id)
        .fetch_one(&self.pool)
        .await?;

        let items = self.get_items(sale_id).await?;
        let installments = self.get_installments(sale_id).await?;
        let payments = self.get_payments(sale_id).await?;

        Ok(Some(SaleDetail {
            sale,
            customer_name,
            items,
            installments,
            payments,
        }))
    }
}
