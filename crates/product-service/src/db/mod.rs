//! Product persistence.
//!
//! # Database: `emporium_products`
//!
//! ## Tables
//!
//! - `products` - catalogue entries, indexed by `sku`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/product-service/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate product
//! ```

mod memory;
mod postgres;

use async_trait::async_trait;
use emporium_core::ProductId;
use emporium_runtime::RepositoryError;

pub use memory::MemoryProductRepository;
pub use postgres::PgProductRepository;

use crate::models::{NewProduct, Product};

/// Storage for products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return it with its assigned id.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Fetch a product. Absent is `Ok(None)`.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// All products in ascending id order.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Products with exactly this SKU, in ascending id order.
    async fn find_by_sku(&self, sku: &str) -> Result<Vec<Product>, RepositoryError>;

    /// Replace every attribute of an existing product.
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown.
    async fn update(&self, product: Product) -> Result<Product, RepositoryError>;

    /// Delete a product. Deleting an unknown id succeeds.
    async fn delete_by_id(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
