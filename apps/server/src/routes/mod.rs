//! HTTP route handlers.
//!
//! Handlers parse and validate, delegate to the ledger or a repository, and
//! translate errors. Business decisions never happen here.

pub mod customer;
pub mod health;
pub mod product;
pub mod sale;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/products", get(product::list).post(product::create))
        .route(
            "/api/products/:id",
            get(product::get).put(product::update).delete(product::remove),
        )
        .route("/api/customers", get(customer::list).post(customer::create))
        .route(
            "/api/customers/:id",
            get(customer::get)
                .put(customer::update)
                .delete(customer::remove),
        )
        .route("/api/sales", get(sale::list).post(sale::create))
        .route("/api/sales/:id", get(sale::detail))
        .route("/api/sales/:id/payments", post(sale::pay))
        .with_state(state)
}
