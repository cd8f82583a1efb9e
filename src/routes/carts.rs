//! Cart routes.
//!
//! Two families share the upstream client:
//! - REST routes (`/carts`, `/carts/{id}`) take `userId` in the body, validate
//!   products fail-fast, and never touch the created id.
//! - Body-driven routes (`/carts/get-cart`, `/carts/manage-cart`,
//!   `/carts/delete-cart`) require a bearer token, take the user id from it,
//!   and validate products by aggregating every problem found.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};

use crate::http::{guard, ApiError, AppState, HandlerError, Operation};
use crate::security::extract_user_id;
use crate::upstream::CartWrite;
use crate::validation::{
    parse_request_body, validate_id, validate_products, validate_required_field,
    validate_user_id, IdKind, ProductsPolicy, ResourceId,
};

const CART_ID_EXAMPLE: &str = r#"{"cartId": 1}"#;
const PRODUCTS_EXAMPLE: &str = r#"{"products": [{"id": 1, "quantity": 2}]}"#;
const CART_WRITE_EXAMPLE: &str = r#"{"userId": 1, "products": [{"id": 1, "quantity": 2}]}"#;

/// Id the upstream actually stores new carts under.
const CREATED_CART_ID: u64 = 1;

/// Creates routes for cart operations
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/carts", get(list_carts).post(create_cart))
        .route("/carts/get-cart", post(get_cart_by_body))
        .route("/carts/manage-cart", post(manage_cart))
        .route("/carts/delete-cart", post(delete_cart_by_body))
        .route(
            "/carts/{id}",
            get(get_cart).put(update_cart).delete(delete_cart),
        )
}

/// Endpoint: GET /carts
async fn list_carts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetAllCarts, async move {
        state
            .store
            .list_carts()
            .await
            .map(Json)
            .map_err(HandlerError::from)
    })
    .await
}

/// Endpoint: GET /carts/{id}
async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetCart, fetch_cart(state, ResourceId::from_segment(&id))).await
}

/// Endpoint: POST /carts
/// Body: `{"userId": 1, "products": [{"id": 1, "quantity": 2}]}`
async fn create_cart(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    guard(Operation::CreateCart, async move {
        let cart = parse_cart_write(&body)?;
        let created = state.store.create_cart(&cart).await?;
        Ok::<_, HandlerError>((StatusCode::CREATED, Json(created)))
    })
    .await
}

/// Endpoint: PUT /carts/{id}
/// Body: `{"userId": 1, "products": [{"id": 1, "quantity": 2}]}`
async fn update_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::UpdateCart, async move {
        let cart = parse_cart_write(&body)?;
        let id = ResourceId::from_segment(&id);
        let updated = state.store.update_cart(&id, &cart).await?;
        Ok::<_, HandlerError>(Json(updated))
    })
    .await
}

/// Endpoint: DELETE /carts/{id}
async fn delete_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::DeleteCart, remove_cart(state, ResourceId::from_segment(&id))).await
}

/// Endpoint: POST /carts/get-cart
/// Body: `{"cartId": 1}`
async fn get_cart_by_body(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::GetCart, async move {
        extract_user_id(&headers)?;
        let id = parse_cart_id(&body)?;
        fetch_cart(state, id).await
    })
    .await
}

/// Endpoint: POST /carts/manage-cart
/// Body: `{"products": [{"id": 1, "quantity": 2}], "cartId": 1}`
///
/// Without a usable `cartId` a new cart is created (201). With one, the
/// cart's products are replaced by the given list (200); an empty list
/// clears the cart.
async fn manage_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    guard(Operation::ManageCart, async move {
        let user_id = extract_user_id(&headers)?;

        let body = parse_request_body(&body)?;
        validate_required_field(&body, "products", PRODUCTS_EXAMPLE)?;
        let products = validate_products(
            body.get("products").unwrap_or(&Value::Null),
            ProductsPolicy::Aggregate,
        )?;
        let cart = CartWrite { user_id, products };

        if requests_update(body.get("cartId")) {
            let id = validate_id(body.get("cartId"), IdKind::Cart)?;
            let updated = state.store.update_cart(&id, &cart).await?;
            return Ok(Json(updated).into_response());
        }

        let mut created = state.store.create_cart(&cart).await?;
        if state.carts.override_created_id {
            if let Some(fields) = created.as_object_mut() {
                fields.insert("id".to_string(), Value::from(CREATED_CART_ID));
            }
        }
        Ok::<_, HandlerError>((StatusCode::CREATED, Json(created)).into_response())
    })
    .await
}

/// Endpoint: POST /carts/delete-cart
/// Body: `{"cartId": 1}`
async fn delete_cart_by_body(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    guard(Operation::DeleteCart, async move {
        extract_user_id(&headers)?;
        let id = parse_cart_id(&body)?;
        remove_cart(state, id).await
    })
    .await
}

async fn fetch_cart(state: AppState, id: ResourceId) -> Result<Json<Value>, HandlerError> {
    Ok(Json(state.store.get_cart(&id).await?))
}

async fn remove_cart(state: AppState, id: ResourceId) -> Result<Json<Value>, HandlerError> {
    Ok(Json(state.store.delete_cart(&id).await?))
}

fn parse_cart_id(raw: &[u8]) -> Result<ResourceId, HandlerError> {
    let body = parse_request_body(raw)?;
    validate_required_field(&body, "cartId", CART_ID_EXAMPLE)?;
    Ok(validate_id(body.get("cartId"), IdKind::Cart)?)
}

fn parse_cart_write(raw: &[u8]) -> Result<CartWrite, HandlerError> {
    let body: Map<String, Value> = parse_request_body(raw)?;
    validate_required_field(&body, "userId", CART_WRITE_EXAMPLE)?;
    validate_required_field(&body, "products", CART_WRITE_EXAMPLE)?;

    Ok(CartWrite {
        user_id: validate_user_id(body.get("userId"))?,
        products: validate_products(
            body.get("products").unwrap_or(&Value::Null),
            ProductsPolicy::FailFast,
        )?,
    })
}

/// `cartId` absent, null, zero or empty means "create a new cart".
fn requests_update(cart_id: Option<&Value>) -> bool {
    match cart_id {
        None | Some(Value::Null) => false,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
