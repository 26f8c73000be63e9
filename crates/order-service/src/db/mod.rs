//! Order persistence.
//!
//! # Database: `emporium_orders`
//!
//! ## Tables
//!
//! - `orders` - one row per order; `cart_id` is an unchecked reference
//!
//! # Migrations
//!
//! Migrations are stored in `crates/order-service/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate order
//! ```

mod memory;
mod postgres;

use async_trait::async_trait;
use emporium_core::OrderId;
use emporium_runtime::RepositoryError;

pub use memory::MemoryOrderRepository;
pub use postgres::PgOrderRepository;

use crate::models::{NewOrder, Order};

/// Storage for orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order and return it with its assigned id.
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Fetch an order. Absent is `Ok(None)`.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// All orders in ascending id order.
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Replace every attribute of an existing order.
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown.
    async fn update(&self, order: Order) -> Result<Order, RepositoryError>;

    /// Delete an order. Deleting an unknown id succeeds.
    async fn delete_by_id(&self, id: OrderId) -> Result<(), RepositoryError>;

    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
