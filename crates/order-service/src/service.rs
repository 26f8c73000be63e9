//! Order business logic.

use std::sync::Arc;

use emporium_core::{OrderDate, OrderDto, OrderId};
use emporium_runtime::ServiceError;

use crate::db::OrderRepository;
use crate::models::NewOrder;

/// Operations exposed by the Order Service.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

const fn not_found(id: OrderId) -> ServiceError {
    ServiceError::NotFound {
        entity: "Order",
        id: id.as_i32(),
    }
}

impl OrderService {
    #[must_use]
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_all(&self) -> Result<Vec<OrderDto>, ServiceError> {
        let orders = self.repo.find_all().await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn find_by_id(&self, id: OrderId) -> Result<OrderDto, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(OrderDto::from)
            .ok_or(not_found(id))
    }

    /// Create an order, stamping the current UTC time when no date is given.
    ///
    /// The cart reference is stored as-is.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn save(&self, dto: OrderDto) -> Result<OrderDto, ServiceError> {
        let order = self
            .repo
            .create(NewOrder::from_dto(dto, OrderDate::now()))
            .await?;
        tracing::info!(
            order_id = %order.id,
            cart_id = order.cart_id.map(|c| c.as_i32()),
            "Order created"
        );
        Ok(order.into())
    }

    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without an `orderId` and
    /// `ServiceError::NotFound` if the id is unknown.
    pub async fn update(&self, dto: OrderDto) -> Result<OrderDto, ServiceError> {
        let id = dto
            .order_id
            .ok_or_else(|| ServiceError::Validation("orderId is required".to_string()))?;
        self.update_by_id(id, dto).await
    }

    /// Update the order identified by `id`, ignoring any id in the body.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn update_by_id(&self, id: OrderId, dto: OrderDto) -> Result<OrderDto, ServiceError> {
        let mut order = self.repo.find_by_id(id).await?.ok_or(not_found(id))?;
        order.apply(dto);
        let order = self.repo.update(order).await?;
        tracing::info!(order_id = %order.id, "Order updated");
        Ok(order.into())
    }

    /// Delete an order. Unknown ids succeed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn delete_by_id(&self, id: OrderId) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
