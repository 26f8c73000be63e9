//! `/api/orders` driven through the router over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use emporium_core::{CartId, Collection, ErrorBody, OrderDate, OrderDto};
use emporium_order_service::{AppState, app};
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

async fn create(router: &Router, body: Value) -> OrderDto {
    let (status, bytes) = send(router, "POST", "/api/orders", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", String::from_utf8_lossy(&bytes));
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_order_for_cart_round_trips() {
    let router = app(AppState::in_memory());
    let created = create(
        &router,
        json!({"orderDesc": "Test order for cart", "cart": {"cartId": 1}}),
    )
    .await;

    let id = created.order_id.expect("generated id");
    assert_eq!(created.cart_id(), Some(CartId::new(1)));
    assert!(created.order_date.is_some());

    let (status, bytes) = send(&router, "GET", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let raw: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(raw["cart"]["cartId"], 1);
    assert_eq!(raw["orderDesc"], "Test order for cart");
    assert_eq!(raw["orderId"], id.as_i32());
}

#[tokio::test]
async fn test_missing_date_is_stamped_with_now() {
    let router = app(AppState::in_memory());
    let before = OrderDate::now();
    let created = create(&router, json!({"orderDesc": "Checkout"})).await;
    let after = OrderDate::now();

    let date = created.order_date.expect("stamped date");
    assert!(before <= date && date <= after);
    assert!(created.cart.is_none());
}

#[tokio::test]
async fn test_supplied_dates_are_accepted_in_every_format() {
    let router = app(AppState::in_memory());
    for input in [
        "2024-10-26",
        "2024-10-26T00:00:00",
        "2024-10-26T00:00:00Z",
        "26-10-2024__00:00:00:000000",
    ] {
        let created = create(&router, json!({"orderDesc": input, "orderDate": input})).await;
        assert_eq!(
            created.order_date.unwrap().to_string(),
            "2024-10-26T00:00:00.000000",
            "{input}"
        );
    }
}

#[tokio::test]
async fn test_unparseable_date_is_rejected() {
    let router = app(AppState::in_memory());
    let (status, bytes) = send(
        &router,
        "POST",
        "/api/orders",
        Some(json!({"orderDesc": "Bad", "orderDate": "tomorrow"})),
    )
    .await;

    assert!(status.is_client_error());
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.status, status.as_u16());

    let (_, bytes) = send(&router, "GET", "/api/orders", None).await;
    let orders: Collection<OrderDto> = serde_json::from_slice(&bytes).unwrap();
    assert!(orders.collection.is_empty());
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let router = app(AppState::in_memory());
    let (status, bytes) = send(&router, "GET", "/api/orders/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.status, 404);
}

#[tokio::test]
async fn test_update_changes_description_and_keeps_cart() {
    let router = app(AppState::in_memory());
    let created = create(
        &router,
        json!({"orderDesc": "first", "orderDate": "2024-10-26", "cart": {"cartId": 7}}),
    )
    .await;
    let id = created.order_id.unwrap();

    let (status, bytes) = send(
        &router,
        "PUT",
        "/api/orders",
        Some(json!({"orderId": id.as_i32(), "orderDesc": "second"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: OrderDto = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(updated.order_desc.as_deref(), Some("second"));
    assert_eq!(updated.cart_id(), Some(CartId::new(7)));
    assert_eq!(updated.order_date, created.order_date);
}

#[tokio::test]
async fn test_update_without_id_is_400() {
    let router = app(AppState::in_memory());
    let (status, _) = send(
        &router,
        "PUT",
        "/api/orders",
        Some(json!({"orderDesc": "orphan"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_fetch_is_404() {
    let router = app(AppState::in_memory());
    let created = create(&router, json!({"orderDesc": "short-lived"})).await;
    let id = created.order_id.unwrap();

    let (status, bytes) = send(&router, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!(true));

    let (status, _) = send(&router, "GET", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
