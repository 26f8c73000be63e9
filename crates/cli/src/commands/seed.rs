//! Seed the Product Service with sample catalogue entries.
//!
//! Products are created through the public API, so the service must be
//! running. SKUs are numbered per round: the first five products are
//! `LAPTOP-001` .. `HEADPHONE-001`, the next five `LAPTOP-002` and so on.

use emporium_client::{ClientError, EmporiumClient, Endpoints};
use emporium_core::ProductDto;
use rust_decimal::Decimal;
use tracing::info;

/// Title, SKU stem, price in cents, quantity.
const SAMPLES: &[(&str, &str, i64, i32)] = &[
    ("Laptop", "LAPTOP", 129_999, 50),
    ("Mouse", "MOUSE", 2_999, 200),
    ("Keyboard", "KEYBOARD", 7_999, 150),
    ("Monitor", "MONITOR", 39_999, 100),
    ("Headphones", "HEADPHONE", 14_999, 120),
];

/// The first `count` sample products.
#[must_use]
pub fn sample_products(count: usize) -> Vec<ProductDto> {
    SAMPLES
        .iter()
        .cycle()
        .take(count)
        .enumerate()
        .map(|(i, (title, stem, cents, quantity))| {
            let round = i / SAMPLES.len() + 1;
            ProductDto::new(
                title,
                &format!("{stem}-{round:03}"),
                Decimal::new(*cents, 2),
                *quantity,
            )
        })
        .collect()
}

/// Create `count` sample products.
///
/// # Errors
///
/// Returns the first `ClientError`; products created before it remain.
pub async fn products(count: usize) -> Result<(), ClientError> {
    let client = EmporiumClient::new(&Endpoints::from_env().await?)?;
    info!(url = client.products().base_url(), count, "Seeding products");

    for product in sample_products(count) {
        let created = client.products().create(&product).await?;
        #[allow(clippy::print_stdout)]
        {
            println!(
                "created product {} {} ({})",
                created.product_id.map_or_else(|| "?".to_string(), |id| id.to_string()),
                created.sku.as_deref().unwrap_or_default(),
                created.product_title.as_deref().unwrap_or_default(),
            );
        }
    }

    info!(count, "Seeding complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_first_round_matches_catalogue() {
        let products = sample_products(5);
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].sku.as_deref(), Some("LAPTOP-001"));
        assert_eq!(products[0].price_unit, Some(Decimal::new(129_999, 2)));
        assert_eq!(products[4].sku.as_deref(), Some("HEADPHONE-001"));
        assert_eq!(products[4].quantity, Some(120));
    }

    #[test]
    fn test_later_rounds_get_fresh_skus() {
        let products = sample_products(7);
        assert_eq!(products[5].sku.as_deref(), Some("LAPTOP-002"));
        assert_eq!(products[6].product_title.as_deref(), Some("Mouse"));
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(sample_products(0).is_empty());
    }
}
