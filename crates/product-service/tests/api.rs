//! `/api/products` driven through the router over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use emporium_core::{Collection, ErrorBody, ProductDto};
use emporium_product_service::{AppState, app};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn create(router: &Router, body: Value) -> ProductDto {
    let (status, bytes) = send(router, "POST", "/api/products", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&bytes));
    serde_json::from_slice(&bytes).unwrap()
}

async fn list(router: &Router, uri: &str) -> Vec<ProductDto> {
    let (status, bytes) = send(router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice::<Collection<ProductDto>>(&bytes)
        .unwrap()
        .into_inner()
}

#[tokio::test]
async fn test_laptop_for_order_is_created_with_generated_id() {
    let router = app(AppState::in_memory());
    let created = create(
        &router,
        json!({
            "productTitle": "Laptop for Order",
            "sku": "ORDER-PRODUCT-1729000000",
            "priceUnit": 899.99,
            "quantity": 10
        }),
    )
    .await;

    let id = created.product_id.expect("generated id");
    assert_eq!(created.price_unit, Some(Decimal::new(89_999, 2)));

    let (status, bytes) = send(&router, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["priceUnit"], json!(899.99));
    assert_eq!(raw["quantity"], 10);
    assert_eq!(raw["productTitle"], "Laptop for Order");
}

#[tokio::test]
async fn test_negative_quantity_is_400_and_nothing_is_stored() {
    let router = app(AppState::in_memory());
    let (status, bytes) = send(
        &router,
        "POST",
        "/api/products",
        Some(json!({"productTitle": "Broken", "sku": "BAD-1", "priceUnit": 1.0, "quantity": -1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "quantity must not be negative");
    assert!(list(&router, "/api/products").await.is_empty());
}

#[tokio::test]
async fn test_price_beyond_column_precision_is_400_and_nothing_is_stored() {
    let router = app(AppState::in_memory());
    let (status, bytes) = send(
        &router,
        "POST",
        "/api/products",
        Some(json!({"productTitle": "Gold", "sku": "GOLD-1", "priceUnit": "12345678901234567.89", "quantity": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.message, "priceUnit exceeds 9999999999.99");
    assert!(list(&router, "/api/products").await.is_empty());
}

#[tokio::test]
async fn test_largest_price_round_trips_exactly() {
    let router = app(AppState::in_memory());
    let created = create(
        &router,
        json!({"productTitle": "Yacht", "sku": "YACHT-1", "priceUnit": "9999999999.99", "quantity": 1}),
    )
    .await;
    assert_eq!(created.price_unit, Some(Decimal::new(999_999_999_999, 2)));

    let id = created.product_id.unwrap();
    let (status, bytes) = send(&router, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: ProductDto = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(fetched.price_unit, Some(Decimal::new(999_999_999_999, 2)));
}

#[tokio::test]
async fn test_sku_filter() {
    let router = app(AppState::in_memory());
    for (title, sku) in [("Mouse", "MOUSE-001"), ("Keyboard", "KEYBOARD-001"), ("Mouse v2", "MOUSE-001")] {
        create(&router, json!({"productTitle": title, "sku": sku, "priceUnit": 29.99, "quantity": 1})).await;
    }

    let mice = list(&router, "/api/products?sku=MOUSE-001").await;
    assert_eq!(mice.len(), 2);
    assert!(mice.iter().all(|p| p.sku.as_deref() == Some("MOUSE-001")));

    assert!(list(&router, "/api/products?sku=MONITOR-001").await.is_empty());
    assert_eq!(list(&router, "/api/products").await.len(), 3);
    assert_eq!(list(&router, "/api/products?sku=").await.len(), 3);
}

#[tokio::test]
async fn test_update_quantity_keeps_other_fields() {
    let router = app(AppState::in_memory());
    let created = create(
        &router,
        json!({"productTitle": "Monitor", "sku": "MONITOR-001", "priceUnit": 399.99, "quantity": 100}),
    )
    .await;
    let id = created.product_id.unwrap();

    let (status, bytes) = send(
        &router,
        "PUT",
        "/api/products",
        Some(json!({"productId": id, "quantity": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: ProductDto = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated.product_id, Some(id));
    assert_eq!(updated.quantity, Some(99));
    assert_eq!(updated.sku.as_deref(), Some("MONITOR-001"));
    assert_eq!(updated.price_unit, Some(Decimal::new(39_999, 2)));
}

#[tokio::test]
async fn test_update_to_negative_quantity_is_400() {
    let router = app(AppState::in_memory());
    let id = create(&router, json!({"productTitle": "Headphones", "quantity": 120}))
        .await
        .product_id
        .unwrap();

    let (status, _) = send(
        &router,
        "PUT",
        &format!("/api/products/{id}"),
        Some(json!({"quantity": -3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, bytes) = send(&router, "GET", &format!("/api/products/{id}"), None).await;
    let unchanged: ProductDto = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(unchanged.quantity, Some(120));
}

#[tokio::test]
async fn test_delete_then_fetch_is_404() {
    let router = app(AppState::in_memory());
    let id = create(&router, json!({"productTitle": "Laptop", "sku": "LAPTOP-001"}))
        .await
        .product_id
        .unwrap();

    let (status, bytes) = send(&router, "DELETE", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"true");

    let (status, _) = send(&router, "GET", &format!("/api/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "DELETE", "/api/products/424242", None).await;
    assert_eq!(status, StatusCode::OK);
}
