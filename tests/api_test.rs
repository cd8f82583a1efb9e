//! End-to-end tests: proxy in front of a mock store.

use serde_json::{json, Value};

mod common;

use common::{read, start_proxy, start_proxy_with, MOCK_CREATED_ID};

#[tokio::test]
async fn test_healthcheck() {
    let proxy = start_proxy().await;
    let res = proxy.client.get(proxy.url("/healthcheck")).send().await.unwrap();

    assert!(res.headers().contains_key("x-request-id"));
    let (status, body) = read(res).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let proxy = start_proxy().await;
    let res = proxy
        .client
        .get(proxy.url("/healthcheck"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me");
}

#[tokio::test]
async fn test_products_are_relayed() {
    let proxy = start_proxy().await;

    let (status, body) = read(proxy.client.get(proxy.url("/products")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) =
        read(proxy.client.get(proxy.url("/products/2")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Product 2");
    assert_eq!(body["category"], "misc");
}

#[tokio::test]
async fn test_single_product_accepts_int_and_string() {
    let proxy = start_proxy().await;

    for id in [json!(3), json!("3")] {
        let (status, body) = read(
            proxy
                .client
                .post(proxy.url("/products/single-product"))
                .json(&json!({ "id": id }))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(body["id"], 3);
    }
}

#[tokio::test]
async fn test_single_product_missing_and_bad_id() {
    let proxy = start_proxy().await;

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/products/single-product"))
            .json(&json!({}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("Missing required field: id"));

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/products/single-product"))
            .json(&json!({"id": [1]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Product ID must be an integer or string"));
}

#[tokio::test]
async fn test_product_not_found() {
    let proxy = start_proxy().await;
    let (status, body) =
        read(proxy.client.get(proxy.url("/products/77")).send().await.unwrap()).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"detail": "Product with ID 77 not found"}));
}

#[tokio::test]
async fn test_missing_cart_is_404_with_id() {
    let proxy = start_proxy().await;
    let (status, body) =
        read(proxy.client.get(proxy.url("/carts/999")).send().await.unwrap()).await;
    assert_eq!(status, 404);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Cart"));
    assert!(detail.contains("999"));
}

#[tokio::test]
async fn test_upstream_failure_is_generic_500() {
    let proxy = start_proxy().await;
    let (status, body) =
        read(proxy.client.get(proxy.url("/carts/500")).send().await.unwrap()).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"detail": "Failed to get cart"}));
}

#[tokio::test]
async fn test_unreachable_upstream_is_unexpected_error() {
    let proxy = start_proxy_with(|config| {
        // Nothing listens on the discard port
        config.upstream.base_url = "http://127.0.0.1:9".into();
    })
    .await;

    let (status, body) = read(proxy.client.get(proxy.url("/carts")).send().await.unwrap()).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"detail": "An unexpected error occurred"}));
}

#[tokio::test]
async fn test_rest_cart_lifecycle() {
    let proxy = start_proxy().await;

    let (status, created) = read(
        proxy
            .client
            .post(proxy.url("/carts"))
            .json(&json!({"userId": "5", "products": [{"id": "2", "quantity": 3}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 201);
    // REST creation relays the upstream id untouched
    assert_eq!(created["id"], MOCK_CREATED_ID);

    let (_, sent) = proxy.store.last_write().unwrap();
    assert_eq!(sent, json!({"userId": 5, "products": [{"id": 2, "quantity": 3}]}));

    let (status, updated) = read(
        proxy
            .client
            .put(proxy.url("/carts/2"))
            .json(&json!({"userId": 2, "products": [{"id": 7}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["products"], json!([{"id": 7}]));

    let (status, _) = read(proxy.client.delete(proxy.url("/carts/2")).send().await.unwrap()).await;
    assert_eq!(status, 200);

    let (status, _) = read(proxy.client.get(proxy.url("/carts/2")).send().await.unwrap()).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_rest_create_itemizes_first_bad_product() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts"))
            .json(&json!({"userId": 1, "products": [{"id": 1}, {"id": 2, "quantity": 0}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["detail"],
        "products[1].quantity must be an integer of 1 or greater"
    );
    assert!(proxy.store.last_write().is_none());
}

#[tokio::test]
async fn test_rest_create_rejects_bad_user_id() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts"))
            .json(&json!({"userId": "abc", "products": []}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("User ID"));
}

#[tokio::test]
async fn test_authenticated_route_requires_bearer() {
    let proxy = start_proxy().await;

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .json(&json!({"cartId": 1}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 401);
    assert!(body["detail"].as_str().unwrap().contains("Bearer token"));

    let (status, _) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .header("Authorization", "Token 1")
            .json(&json!({"cartId": 1}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_auth_checked_before_body() {
    let proxy = start_proxy().await;
    let (status, _) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .body("not json")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_empty_body_reports_missing_field() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .bearer_auth("1")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(
        body["detail"],
        r#"Missing required field: cartId. Example: {"cartId": 1}"#
    );
}

#[tokio::test]
async fn test_invalid_json_and_non_object_bodies() {
    let proxy = start_proxy().await;

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .bearer_auth("1")
            .body("{cartId")
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("invalid JSON"));

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .bearer_auth("1")
            .json(&json!([{"cartId": 1}]))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("JSON object"));
}

#[tokio::test]
async fn test_cart_id_type_is_checked() {
    let proxy = start_proxy().await;
    for cart_id in [json!(1.5), json!(true), json!({"id": 1})] {
        let (status, _) = read(
            proxy
                .client
                .post(proxy.url("/carts/get-cart"))
                .bearer_auth("1")
                .json(&json!({ "cartId": cart_id }))
                .send()
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, 400, "cartId {}", cart_id);
    }
}

#[tokio::test]
async fn test_manage_cart_create_then_get() {
    let proxy = start_proxy().await;

    let (status, created) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("9")
            .json(&json!({"products": [{"id": 1, "quantity": 2}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["id"], 1);

    // The token, not the body, decides the user
    let (_, sent) = proxy.store.last_write().unwrap();
    assert_eq!(sent["userId"], 9);

    let (status, fetched) = read(
        proxy
            .client
            .post(proxy.url("/carts/get-cart"))
            .bearer_auth("9")
            .json(&json!({ "cartId": created["id"] }))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(fetched["products"], json!([{"id": 1, "quantity": 2}]));
}

#[tokio::test]
async fn test_large_quantity_forwarded_unchanged() {
    let proxy = start_proxy().await;
    let quantity = u64::from(u32::MAX) + 7;

    let (status, _) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("3")
            .json(&json!({"products": [{"id": 4, "quantity": quantity}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 201);

    let (_, sent) = proxy.store.last_write().unwrap();
    assert_eq!(sent["products"], json!([{"id": 4, "quantity": quantity}]));
}

#[tokio::test]
async fn test_manage_cart_without_id_rewrite() {
    let proxy = start_proxy_with(|config| config.carts.override_created_id = false).await;

    let (status, created) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("9")
            .json(&json!({"products": [{"id": 1}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["id"], MOCK_CREATED_ID);
}

#[tokio::test]
async fn test_manage_cart_update_replaces_products() {
    let proxy = start_proxy().await;

    let (status, updated) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("1")
            .json(&json!({"cartId": "1", "products": []}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["products"], json!([]));

    let (route, sent) = proxy.store.last_write().unwrap();
    assert_eq!(route, "PUT /carts/1");
    assert_eq!(sent, json!({"userId": 1, "products": []}));
}

#[tokio::test]
async fn test_manage_cart_update_of_missing_cart() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("1")
            .json(&json!({"cartId": 404, "products": [{"id": 1}]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"detail": "Cart with ID 404 not found"}));
}

#[tokio::test]
async fn test_manage_cart_aggregates_product_errors() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("1")
            .json(&json!({"products": [{"id": "x"}, {"id": 1, "quantity": -1}, 5]}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);

    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("There are issues with the products in your request."));
    assert!(detail.contains("invalid IDs"));
    assert!(detail.contains("invalid quantities"));
    assert!(detail.contains("not properly formatted"));
    assert!(proxy.store.last_write().is_none());
}

#[tokio::test]
async fn test_manage_cart_requires_products() {
    let proxy = start_proxy().await;
    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/manage-cart"))
            .bearer_auth("1")
            .json(&json!({"cartId": 1}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Missing required field: products."));
}

#[tokio::test]
async fn test_delete_cart_by_body() {
    let proxy = start_proxy().await;

    let (status, deleted) = read(
        proxy
            .client
            .post(proxy.url("/carts/delete-cart"))
            .bearer_auth("2")
            .json(&json!({"cartId": 2}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(deleted["id"], 2);

    let (status, body) = read(
        proxy
            .client
            .post(proxy.url("/carts/delete-cart"))
            .bearer_auth("2")
            .json(&json!({"cartId": 2}))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Cart with ID 2 not found");
}

#[tokio::test]
async fn test_list_carts() {
    let proxy = start_proxy().await;
    let (status, body) = read(proxy.client.get(proxy.url("/carts")).send().await.unwrap()).await;
    assert_eq!(status, 200);
    let ids: Vec<Value> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].clone())
        .collect();
    assert!(ids.contains(&json!(1)));
    assert!(ids.contains(&json!(2)));
}
