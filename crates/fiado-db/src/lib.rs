//! # fiado-db: Database Layer for the Fiado Ledger
//!
//! SQLite storage via sqlx, plus the transactional ledger engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Fiado Data Flow                             │
//! │                                                                     │
//! │  HTTP handler (POST /api/sales)                                     │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                   fiado-db (THIS CRATE)                       │  │
//! │  │                                                               │  │
//! │  │  ┌────────────┐  ┌──────────────┐  ┌───────────────────────┐ │  │
//! │  │  │  Database  │  │ Repositories │  │  Ledger               │ │  │
//! │  │  │  (pool.rs) │  │ product      │  │  create_sale          │ │  │
//! │  │  │            │◄─│ customer     │  │  apply_payment        │ │  │
//! │  │  │ SqlitePool │  │ sale (reads) │  │  (transactions)       │ │  │
//! │  │  └────────────┘  └──────────────┘  └───────────────────────┘ │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL, foreign keys on)                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Row-level repositories (product, customer, sale reads)
//! - [`ledger`] - The transactional ledger engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiado_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/fiado.db")).await?;
//! let created = db.ledger().create_sale(&request).await?;
//! let detail = db.sales().detail(&created.sale_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use ledger::{CreatedSale, Ledger, LedgerError};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::{CustomerInput, CustomerRepository};
pub use repository::product::{ProductInput, ProductRepository};
pub use repository::sale::SaleRepository;
