//! Product CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use fiado_core::validation;
use fiado_core::Product;
use fiado_db::ProductInput;

use crate::error::ApiError;
use crate::state::AppState;

fn validate_input(input: &ProductInput) -> Result<(), ApiError> {
    validation::validate_name("name", &input.name)?;
    validation::validate_non_negative("costCents", input.cost_cents)?;
    validation::validate_non_negative("priceCents", input.price_cents)?;
    validation::validate_non_negative("quantityOnHand", input.quantity_on_hand)?;
    Ok(())
}

/// `GET /api/products`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

/// `GET /api/products/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;
    Ok(Json(product))
}

/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    debug!(name = %input.name, "create product");
    validate_input(&input)?;

    let product = state.db.products().create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, ApiError> {
    validate_input(&input)?;

    let product = state.db.products().update(&id, &input).await?;
    Ok(Json(product))
}

/// `DELETE /api/products/:id` - refused while the product is referenced by
/// any sale line.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.db.products().delete(&id).await?;
    Ok(Json(json!({ "ok": true })))
}
