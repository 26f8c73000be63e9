//! Product transfer record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::decimal::option_number;
use super::id::ProductId;

/// A product as exchanged over the Product Service API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDto {
    /// Assigned by the service on create; required on update.
    pub product_id: Option<ProductId>,
    pub product_title: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    /// Unit price, carried as a JSON number.
    #[serde(with = "option_number")]
    pub price_unit: Option<Decimal>,
    /// Units in stock. Never negative once persisted.
    pub quantity: Option<i32>,
}

impl ProductDto {
    /// Build a transfer record for a product that does not exist yet.
    #[must_use]
    pub fn new(title: &str, sku: &str, price_unit: Decimal, quantity: i32) -> Self {
        Self {
            product_id: None,
            product_title: Some(title.to_owned()),
            image_url: None,
            sku: Some(sku.to_owned()),
            price_unit: Some(price_unit),
            quantity: Some(quantity),
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: &str) -> Self {
        self.image_url = Some(image_url.to_owned());
        self
    }
}
