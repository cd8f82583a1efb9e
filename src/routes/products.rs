//! Product routes.

use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::http::{guard, ApiError, AppState, HandlerError, Operation};
use crate::validation::{
    parse_request_body, validate_id, validate_required_field, IdKind, ResourceId,
};

/// Creates routes for product operations
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/single-product", post(single_product))
        .route("/products/{id}", get(get_product))
}

/// Endpoint: GET /products
async fn list_products(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetAllProducts, async move {
        state
            .store
            .list_products()
            .await
            .map(Json)
            .map_err(HandlerError::from)
    })
    .await
}

/// Endpoint: GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetProduct, fetch_product(state, ResourceId::from_segment(&id))).await
}

/// Endpoint: POST /products/single-product
/// Body: `{"id": 1}`
async fn single_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetProduct, async move {
        let body = parse_request_body(&body)?;
        validate_required_field(&body, "id", r#"{"id": 1}"#)?;
        let id = validate_id(body.get("id"), IdKind::Product)?;

        fetch_product(state, id).await
    })
    .await
}

async fn fetch_product(state: AppState, id: ResourceId) -> Result<Json<Value>, HandlerError> {
    Ok(Json(state.store.get_product(&id).await?))
}
