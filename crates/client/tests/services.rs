//! Clients and the checkout flow against in-process services.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::net::SocketAddr;

use axum::Router;
use emporium_client::{
    CheckoutFlow, CheckoutRequest, CheckoutStep, ClientError, EmporiumClient, Endpoints, Health,
};
use emporium_core::{CartId, OrderDto, ProductDto, UserDto, UserId};
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use url::Url;

async fn spawn(router: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// An address nothing listens on.
async fn closed_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn running() -> EmporiumClient {
    let endpoints = Endpoints {
        user: spawn(emporium_user_service::app(emporium_user_service::AppState::in_memory())).await,
        product: spawn(emporium_product_service::app(
            emporium_product_service::AppState::in_memory(),
        ))
        .await,
        order: spawn(emporium_order_service::app(emporium_order_service::AppState::in_memory())).await,
    };
    EmporiumClient::new(&endpoints).unwrap()
}

fn laptop_checkout() -> CheckoutRequest {
    CheckoutRequest {
        customer: UserDto::new("Order", "Customer", "order.flow@example.com").with_phone("5551234567"),
        product: ProductDto::new("Laptop for Order", "ORDER-PRODUCT-1", Decimal::new(89_999, 2), 10)
            .with_image_url("http://example.com/laptop.jpg"),
        order_desc: "E2E Test Order - Laptop Purchase".to_string(),
        order_date: Some("2024-10-26".parse().unwrap()),
        cart_id: Some(CartId::new(1)),
    }
}

#[tokio::test]
async fn test_user_crud() {
    let client = running().await;
    let users = client.users();

    let created = users
        .create(&UserDto::new("Ada", "Lovelace", "ada@example.com"))
        .await
        .unwrap();
    let id = created.user_id.unwrap();
    assert_eq!(users.get(id).await.unwrap(), created);

    let mut change = created.clone();
    change.phone = Some("5550000000".to_string());
    let updated = users.update(&change).await.unwrap();
    assert_eq!(updated.phone.as_deref(), Some("5550000000"));
    assert_eq!(updated.user_id, Some(id));

    assert!(users.delete(id).await.unwrap());
    assert!(users.get(id).await.unwrap_err().is_not_found());
    assert!(users.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_product_sku_lookup_and_rejection() {
    let client = running().await;
    let products = client.products();

    for (title, sku) in [("Mouse", "MOUSE-001"), ("Keyboard", "KEYBOARD-001")] {
        products
            .create(&ProductDto::new(title, sku, Decimal::new(2999, 2), 5))
            .await
            .unwrap();
    }

    let found = products.find_by_sku("MOUSE-001").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].product_title.as_deref(), Some("Mouse"));
    assert_eq!(products.list().await.unwrap().len(), 2);

    let err = products
        .create(&ProductDto::new("Broken", "BAD-1", Decimal::ONE, -1))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, ClientError::Rejected { status: 400, message, .. } if message.contains("quantity")),
        "{err}"
    );
    assert_eq!(products.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_order_update_by_id() {
    let client = running().await;
    let orders = client.orders();

    let created = orders
        .create(&OrderDto::new("first").with_cart(CartId::new(3)))
        .await
        .unwrap();
    let id = created.order_id.unwrap();

    let updated = orders
        .update_by_id(
            id,
            &OrderDto {
                order_desc: Some("second".to_string()),
                ..OrderDto::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.order_desc.as_deref(), Some("second"));
    assert_eq!(updated.cart_id(), Some(CartId::new(3)));
}

#[tokio::test]
async fn test_checkout_flow_creates_and_verifies() {
    let client = running().await;
    let receipt = CheckoutFlow::new(client.clone())
        .run(laptop_checkout())
        .await
        .unwrap();

    assert_eq!(receipt.order.cart_id(), Some(CartId::new(1)));
    assert_eq!(
        receipt.order.order_date.unwrap().to_string(),
        "2024-10-26T00:00:00.000000"
    );
    assert_eq!(receipt.product.price_unit, Some(Decimal::new(89_999, 2)));

    let user = client.users().get(receipt.user.user_id.unwrap()).await.unwrap();
    assert_eq!(user.email.as_deref(), Some("order.flow@example.com"));
}

#[tokio::test]
async fn test_checkout_failure_keeps_earlier_records() {
    let client = running().await;
    let mut request = laptop_checkout();
    request.product.quantity = Some(-5);

    let err = CheckoutFlow::new(client.clone())
        .run(request)
        .await
        .unwrap_err();

    assert_eq!(err.step, CheckoutStep::CreateProduct);
    assert!(!err.is_unavailable());
    assert_eq!(err.context.created(), vec!["user 1"]);

    // No rollback: the customer is still there.
    assert!(client.users().get(UserId::new(1)).await.is_ok());
    assert!(client.orders().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let endpoints = Endpoints {
        user: closed_url().await,
        product: closed_url().await,
        order: closed_url().await,
    };
    let client = EmporiumClient::new(&endpoints).unwrap();

    let err = client.users().list().await.unwrap_err();
    assert!(err.is_unavailable(), "{err}");

    let err = CheckoutFlow::new(client.clone())
        .run(laptop_checkout())
        .await
        .unwrap_err();
    assert_eq!(err.step, CheckoutStep::CreateUser);
    assert!(err.is_unavailable());
    assert!(err.context.created().is_empty());

    for (_, health) in client.probe().await {
        assert!(matches!(health, Health::Unavailable(_)));
    }
}

#[tokio::test]
async fn test_probe_reports_up() {
    let client = running().await;
    for (service, health) in client.probe().await {
        assert_eq!(health, Health::Up, "{service}");
    }
}
