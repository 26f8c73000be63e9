//! Product domain model.

use chrono::{DateTime, Utc};
use emporium_core::{ProductDto, ProductId};
use rust_decimal::Decimal;

/// Scale of the `price_unit` column.
pub const PRICE_SCALE: u32 = 2;

/// A persisted product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub product_title: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub price_unit: Option<Decimal>,
    /// Units in stock, never negative.
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProduct {
    pub product_title: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub price_unit: Option<Decimal>,
    pub quantity: i32,
}

impl Product {
    /// Overwrite every attribute present in `dto`. The id never changes.
    pub fn apply(&mut self, dto: ProductDto) {
        if let Some(title) = dto.product_title {
            self.product_title = Some(title);
        }
        if let Some(image_url) = dto.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(sku) = dto.sku {
            self.sku = Some(sku);
        }
        if let Some(price) = dto.price_unit {
            self.price_unit = Some(price.round_dp(PRICE_SCALE));
        }
        if let Some(quantity) = dto.quantity {
            self.quantity = quantity;
        }
    }
}

/// Client-supplied ids are ignored on create; a missing quantity means none in stock.
impl From<ProductDto> for NewProduct {
    fn from(dto: ProductDto) -> Self {
        Self {
            product_title: dto.product_title,
            image_url: dto.image_url,
            sku: dto.sku,
            price_unit: dto.price_unit.map(|p| p.round_dp(PRICE_SCALE)),
            quantity: dto.quantity.unwrap_or(0),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            product_id: Some(product.id),
            product_title: product.product_title,
            image_url: product.image_url,
            sku: product.sku,
            price_unit: product.price_unit,
            quantity: Some(product.quantity),
        }
    }
}
