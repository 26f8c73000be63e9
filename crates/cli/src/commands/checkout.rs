//! Run the cross-service order flow against running services.
//!
//! The customer email and product SKU carry a millisecond timestamp so
//! repeated runs never collide.

use chrono::Utc;
use emporium_client::{CheckoutFlow, CheckoutReceipt, CheckoutRequest, EmporiumClient, Endpoints};
use emporium_core::{CartId, ProductDto, UserDto};
use rust_decimal::Decimal;

/// Default order description.
pub const DEFAULT_DESCRIPTION: &str = "E2E Test Order - Laptop Purchase";

/// Build the request for one run, stamped with `millis`.
#[must_use]
pub fn request(description: &str, cart_id: Option<CartId>, millis: i64) -> CheckoutRequest {
    CheckoutRequest {
        customer: UserDto::new("Order", "Customer", &format!("order.flow.{millis}@example.com"))
            .with_phone("5551234567"),
        product: ProductDto::new(
            "Laptop for Order",
            &format!("ORDER-PRODUCT-{millis}"),
            Decimal::new(89_999, 2),
            10,
        )
        .with_image_url("http://example.com/laptop.jpg"),
        order_desc: description.to_string(),
        order_date: None,
        cart_id,
    }
}

/// Run the flow and print the receipt.
///
/// # Errors
///
/// Returns an error naming the failed step and the records left behind.
pub async fn run(description: &str, cart_id: Option<i32>) -> Result<(), Box<dyn std::error::Error>> {
    let client = EmporiumClient::new(&Endpoints::from_env().await?)?;
    let flow = CheckoutFlow::new(client);

    let request = request(description, cart_id.map(CartId::new), Utc::now().timestamp_millis());
    match flow.run(request).await {
        Ok(receipt) => {
            print_receipt(&receipt);
            Ok(())
        }
        Err(e) => {
            let created = e.context.created();
            if !created.is_empty() {
                tracing::warn!("Left in place: {}", created.join(", "));
            }
            Err(e.into())
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_receipt(receipt: &CheckoutReceipt) {
    let id = |id: Option<String>| id.unwrap_or_else(|| "?".to_string());

    println!(
        "user     {}  {}",
        id(receipt.user.user_id.map(|i| i.to_string())),
        receipt.user.email.as_deref().unwrap_or_default()
    );
    println!(
        "product  {}  {}",
        id(receipt.product.product_id.map(|i| i.to_string())),
        receipt.product.sku.as_deref().unwrap_or_default()
    );
    println!(
        "order    {}  {}  {}",
        id(receipt.order.order_id.map(|i| i.to_string())),
        id(receipt.order.order_date.map(|d| d.to_string())),
        receipt.order.order_desc.as_deref().unwrap_or_default()
    );
    if let Some(cart_id) = receipt.order.cart_id() {
        println!("cart     {cart_id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_stamped() {
        let request = request(DEFAULT_DESCRIPTION, Some(CartId::new(1)), 1_729_000_000_000);
        assert_eq!(
            request.customer.email.as_deref(),
            Some("order.flow.1729000000000@example.com")
        );
        assert_eq!(request.product.sku.as_deref(), Some("ORDER-PRODUCT-1729000000000"));
        assert_eq!(request.product.price_unit, Some(Decimal::new(89_999, 2)));
        assert_eq!(request.cart_id, Some(CartId::new(1)));
        assert!(request.order_date.is_none());
    }
}
