//! Product business logic: DTO mapping, stock and price validation.

use std::sync::Arc;

use emporium_core::{ProductDto, ProductId};
use emporium_runtime::ServiceError;
use rust_decimal::Decimal;

use crate::db::ProductRepository;

/// Operations exposed by the Product Service.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

/// Largest price a `NUMERIC(12, 2)` column holds.
const MAX_PRICE_UNIT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Reject negative stock and prices outside `0..=MAX_PRICE_UNIT`.
fn validate(dto: &ProductDto) -> Result<(), ServiceError> {
    if dto.quantity.is_some_and(|q| q < 0) {
        return Err(ServiceError::Validation(
            "quantity must not be negative".to_string(),
        ));
    }
    if dto.price_unit.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ServiceError::Validation(
            "priceUnit must not be negative".to_string(),
        ));
    }
    if dto.price_unit.is_some_and(|p| p > MAX_PRICE_UNIT) {
        return Err(ServiceError::Validation(format!(
            "priceUnit exceeds {MAX_PRICE_UNIT}"
        )));
    }
    Ok(())
}

const fn not_found(id: ProductId) -> ServiceError {
    ServiceError::NotFound {
        entity: "Product",
        id: id.as_i32(),
    }
}

impl ProductService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_all(&self) -> Result<Vec<ProductDto>, ServiceError> {
        let products = self.repo.find_all().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Products carrying exactly this SKU.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_by_sku(&self, sku: &str) -> Result<Vec<ProductDto>, ServiceError> {
        let products = self.repo.find_by_sku(sku).await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn find_by_id(&self, id: ProductId) -> Result<ProductDto, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(ProductDto::from)
            .ok_or(not_found(id))
    }

    /// Create a product. Any `productId` in the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for a negative quantity or a price
    /// outside `0..=9999999999.99`.
    /// Nothing is stored in that case.
    pub async fn save(&self, dto: ProductDto) -> Result<ProductDto, ServiceError> {
        validate(&dto)?;
        let product = self.repo.create(dto.into()).await?;
        tracing::info!(
            product_id = %product.id,
            sku = product.sku.as_deref().unwrap_or(""),
            "Product created"
        );
        Ok(product.into())
    }

    /// Update the product identified by the body's `productId`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without an id or for out-of-range
    /// values, `ServiceError::NotFound` if the id is unknown.
    pub async fn update(&self, dto: ProductDto) -> Result<ProductDto, ServiceError> {
        let id = dto
            .product_id
            .ok_or_else(|| ServiceError::Validation("productId is required".to_string()))?;
        self.update_by_id(id, dto).await
    }

    /// Update the product identified by `id`, ignoring any id in the body.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` for out-of-range values and
    /// `ServiceError::NotFound` if the id is unknown.
    pub async fn update_by_id(
        &self,
        id: ProductId,
        dto: ProductDto,
    ) -> Result<ProductDto, ServiceError> {
        validate(&dto)?;
        let mut product = self.repo.find_by_id(id).await?.ok_or(not_found(id))?;

        product.apply(dto);
        let product = self.repo.update(product).await?;
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product.into())
    }

    /// Delete a product. Unknown ids succeed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn delete_by_id(&self, id: ProductId) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
