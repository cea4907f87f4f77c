//! # Product Repository
//!
//! Database operations for products.
//!
//! Plain row I/O: create, read, update, guarded delete. Stock quantities are
//! read and decremented exclusively by the ledger engine inside its
//! sale-creation transaction, never here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::Product;

/// Input payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost_cents: i64,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub quantity_on_hand: i64,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns it.
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            cost_cents: input.cost_cents,
            price_cents: input.price_cents,
            quantity_on_hand: input.quantity_on_hand,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, cost_cents, price_cents,
                quantity_on_hand, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.quantity_on_hand)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, cost_cents, price_cents,
                   quantity_on_hand, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, cost_cents, price_cents,
                   quantity_on_hand, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates a product's attributes and returns the stored row.
    ///
    /// Note this replaces `quantity_on_hand` too: stock corrections are an
    /// inventory action, distinct from the ledger's sale-time decrements.
    pub async fn update(&self, id: &str, input: &ProductInput) -> DbResult<Product> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                cost_cents = ?4,
                price_cents = ?5,
                quantity_on_hand = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.cost_cents)
        .bind(input.price_cents)
        .bind(input.quantity_on_hand)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product, refusing while any sale line references it.
    ///
    /// Sale lines freeze prices but keep the product reference for history,
    /// so a referenced product must stay.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let referenced: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM sale_items WHERE product_id = ?1 LIMIT 1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        if referenced.is_some() {
            return Err(DbError::still_referenced("Product", id));
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(id = %id, "Product deleted");
        Ok(())
    }
}
