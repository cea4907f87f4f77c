//! Customer CRUD handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use fiado_core::validation;
use fiado_core::Customer;
use fiado_db::CustomerInput;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/customers`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.db.customers().list().await?;
    Ok(Json(customers))
}

/// `GET /api/customers/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer", &id))?;
    Ok(Json(customer))
}

/// `POST /api/customers`
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    debug!(first_name = %input.first_name, "create customer");
    validation::validate_name("firstName", &input.first_name)?;

    let customer = state.db.customers().create(&input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// `PUT /api/customers/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, ApiError> {
    validation::validate_name("firstName", &input.first_name)?;

    let customer = state.db.customers().update(&id, &input).await?;
    Ok(Json(customer))
}

/// `DELETE /api/customers/:id` - refused while the customer has sales.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.db.customers().delete(&id).await?;
    Ok(Json(json!({ "ok": true })))
}
