//! Sale and payment handlers: the ledger's HTTP face.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::debug;

use fiado_core::allocation::PaymentOutcome;
use fiado_core::request::{CreateSaleRequest, PaymentRequest};
use fiado_core::{SaleDetail, SaleSummary};
use fiado_db::CreatedSale;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/sales` - headers with customer names, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SaleSummary>>, ApiError> {
    let sales = state.db.sales().list().await?;
    Ok(Json(sales))
}

/// `GET /api/sales/:id` - header, items, installments, payments.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaleDetail>, ApiError> {
    let detail = state
        .db
        .sales()
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", &id))?;
    Ok(Json(detail))
}

/// `POST /api/sales` - atomic sale creation.
///
/// Validation and the whole transaction story live in the ledger; this
/// handler only moves JSON.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSaleRequest>,
) -> Result<(StatusCode, Json<CreatedSale>), ApiError> {
    debug!(customer_id = %req.customer_id, mode = ?req.payment_mode, "create sale");

    let created = state.db.ledger().create_sale(&req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /api/sales/:id/payments` - apply a payment to a credit sale.
///
/// Not idempotent: identical requests create distinct payments. Callers
/// must not blind-retry after a timeout.
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<PaymentOutcome>, ApiError> {
    debug!(sale_id = %id, amount_cents = req.amount_cents, "apply payment");

    let outcome = state.db.ledger().apply_payment(&id, &req).await?;
    Ok(Json(outcome))
}
