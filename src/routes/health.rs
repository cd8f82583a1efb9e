use axum::Json;
use serde_json::{json, Value};

/// Endpoint: GET /healthcheck
pub async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
