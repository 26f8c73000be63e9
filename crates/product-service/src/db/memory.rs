use async_trait::async_trait;
use chrono::Utc;
use emporium_core::ProductId;
use emporium_runtime::{MemoryTable, RepositoryError};

use super::ProductRepository;
use crate::models::{NewProduct, Product};

/// In-process product repository for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryProductRepository {
    table: MemoryTable<Product>,
}

impl MemoryProductRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: MemoryTable::new(),
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        // Same constraint the products table enforces
        if product.quantity < 0 {
            return Err(RepositoryError::Conflict(
                "quantity must not be negative".to_owned(),
            ));
        }

        let now = Utc::now();
        self.table
            .insert_with(|id| Product {
                id: ProductId::new(id),
                product_title: product.product_title,
                image_url: product.image_url,
                sku: product.sku,
                price_unit: product.price_unit,
                quantity: product.quantity,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.table.get(id.as_i32()).await)
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.table.all().await)
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .table
            .filter(|product| product.sku.as_deref() == Some(sku))
            .await)
    }

    async fn update(&self, mut product: Product) -> Result<Product, RepositoryError> {
        if product.quantity < 0 {
            return Err(RepositoryError::Conflict(
                "quantity must not be negative".to_owned(),
            ));
        }

        product.updated_at = Utc::now();
        self.table.replace(product.id.as_i32(), product).await
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.table.remove(id.as_i32()).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn new_product(sku: &str, quantity: i32) -> NewProduct {
        NewProduct {
            product_title: Some("Keyboard".into()),
            image_url: None,
            sku: Some(sku.into()),
            price_unit: Some(Decimal::new(7999, 2)),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_find_by_sku_matches_exactly() {
        let repo = MemoryProductRepository::new();
        repo.create(new_product("KEYBOARD-001", 150)).await.unwrap();
        repo.create(new_product("KEYBOARD-0012", 1)).await.unwrap();
        let wanted = repo.create(new_product("KEYBOARD-001", 3)).await.unwrap();

        let found = repo.find_by_sku("KEYBOARD-001").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1], wanted);
        assert!(repo.find_by_sku("NOPE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_quantity_is_a_constraint_violation() {
        let repo = MemoryProductRepository::new();
        let err = repo.create(new_product("BAD-1", -1)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
