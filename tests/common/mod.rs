//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use store_proxy::config::ProxyConfig;
use store_proxy::{HttpServer, Shutdown};

/// Id the mock hands out for every created cart, like the real store.
pub const MOCK_CREATED_ID: u64 = 11;

/// In-memory stand-in for the upstream store.
#[derive(Clone, Default)]
pub struct MockStore {
    carts: Arc<Mutex<HashMap<String, Value>>>,
    /// Bodies received on POST/PUT, in order.
    pub writes: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockStore {
    pub fn last_write(&self) -> Option<(String, Value)> {
        self.writes.lock().unwrap().last().cloned()
    }
}

fn product(id: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Product {}", id),
        "price": 9.99,
        "description": "A product",
        "category": "misc",
        "image": format!("https://example.com/{}.png", id)
    })
}

async fn list_products() -> Json<Value> {
    Json(json!([product(1), product(2)]))
}

async fn get_product(Path(id): Path<String>) -> impl IntoResponse {
    match id.parse::<u64>() {
        Ok(id @ 1..=20) => (StatusCode::OK, Json(product(id))).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_carts(State(store): State<MockStore>) -> Json<Value> {
    let carts = store.carts.lock().unwrap();
    Json(Value::Array(carts.values().cloned().collect()))
}

async fn get_cart(State(store): State<MockStore>, Path(id): Path<String>) -> impl IntoResponse {
    if id == "500" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    match store.carts.lock().unwrap().get(&id) {
        Some(cart) => Json(cart.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// New carts land in slot 1 while the reply says 11, mirroring the real store.
async fn create_cart(State(store): State<MockStore>, Json(body): Json<Value>) -> Json<Value> {
    store.writes.lock().unwrap().push(("POST /carts".into(), body.clone()));

    let mut stored = body.clone();
    stored["id"] = json!(1);
    store.carts.lock().unwrap().insert("1".into(), stored);

    let mut reply = body;
    reply["id"] = json!(MOCK_CREATED_ID);
    Json(reply)
}

async fn update_cart(
    State(store): State<MockStore>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    store
        .writes
        .lock()
        .unwrap()
        .push((format!("PUT /carts/{}", id), body.clone()));

    let mut carts = store.carts.lock().unwrap();
    if !carts.contains_key(&id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut updated = body;
    updated["id"] = json!(id.parse::<u64>().unwrap_or_default());
    carts.insert(id, updated.clone());
    Json(updated).into_response()
}

async fn delete_cart(State(store): State<MockStore>, Path(id): Path<String>) -> impl IntoResponse {
    match store.carts.lock().unwrap().remove(&id) {
        Some(cart) => Json(cart).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start the mock store on an ephemeral port, seeded with carts 1 and 2.
pub async fn start_mock_store() -> (SocketAddr, MockStore) {
    let store = MockStore::default();
    {
        let mut carts = store.carts.lock().unwrap();
        carts.insert(
            "1".into(),
            json!({"id": 1, "userId": 1, "products": [{"id": 1, "quantity": 4}]}),
        );
        carts.insert(
            "2".into(),
            json!({"id": 2, "userId": 2, "products": [{"id": 2, "quantity": 1}]}),
        );
    }

    let app = Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/carts", get(list_carts).post(create_cart))
        .route(
            "/carts/{id}",
            get(get_cart).put(update_cart).delete(delete_cart),
        )
        .with_state(store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, store)
}

/// A running proxy pointed at a mock store.
pub struct TestProxy {
    pub base: String,
    pub store: MockStore,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a mock store and a proxy in front of it.
pub async fn start_proxy() -> TestProxy {
    start_proxy_with(|_| {}).await
}

/// Like `start_proxy`, with a hook to adjust the config first.
pub async fn start_proxy_with<F: FnOnce(&mut ProxyConfig)>(adjust: F) -> TestProxy {
    let (store_addr, store) = start_mock_store().await;

    let mut config = ProxyConfig::default();
    config.upstream.base_url = format!("http://{}", store_addr);
    config.listener.bind_address = "127.0.0.1:0".into();
    adjust(&mut config);

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    TestProxy {
        base: format!("http://{}", addr),
        store,
        client,
        shutdown,
    }
}

/// Status and JSON body of a response.
pub async fn read(res: reqwest::Response) -> (u16, Value) {
    let status = res.status().as_u16();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}
