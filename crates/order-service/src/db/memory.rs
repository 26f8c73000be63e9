use async_trait::async_trait;
use chrono::Utc;
use emporium_core::OrderId;
use emporium_runtime::{MemoryTable, RepositoryError};

use super::OrderRepository;
use crate::models::{NewOrder, Order};

/// In-process order repository for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    table: MemoryTable<Order>,
}

impl MemoryOrderRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: MemoryTable::new(),
        }
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        self.table
            .insert_with(|id| Order {
                id: OrderId::new(id),
                order_date: order.order_date,
                order_desc: order.order_desc,
                cart_id: order.cart_id,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.table.get(id.as_i32()).await)
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.table.all().await)
    }

    async fn update(&self, mut order: Order) -> Result<Order, RepositoryError> {
        order.updated_at = Utc::now();
        self.table.replace(order.id.as_i32(), order).await
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.table.remove(id.as_i32()).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
