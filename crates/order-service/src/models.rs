//! Order domain model.

use chrono::{DateTime, Utc};
use emporium_core::{CartId, CartRef, OrderDate, OrderDto, OrderId};

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub order_date: OrderDate,
    pub order_desc: Option<String>,
    /// Opaque; never checked against a cart store.
    pub cart_id: Option<CartId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub order_date: OrderDate,
    pub order_desc: Option<String>,
    pub cart_id: Option<CartId>,
}

impl Order {
    /// Overwrite every attribute present in `dto`. The id never changes.
    pub fn apply(&mut self, dto: OrderDto) {
        if let Some(date) = dto.order_date {
            self.order_date = date;
        }
        if let Some(desc) = dto.order_desc {
            self.order_desc = Some(desc);
        }
        if let Some(cart) = dto.cart {
            self.cart_id = Some(cart.cart_id);
        }
    }
}

impl NewOrder {
    /// Build from a transfer record, stamping `now` when no date was sent.
    /// Client-supplied ids are ignored.
    #[must_use]
    pub fn from_dto(dto: OrderDto, now: OrderDate) -> Self {
        Self {
            order_date: dto.order_date.unwrap_or(now),
            cart_id: dto.cart_id(),
            order_desc: dto.order_desc,
        }
    }
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            order_id: Some(order.id),
            order_date: Some(order.order_date),
            order_desc: order.order_desc,
            cart: order.cart_id.map(|cart_id| CartRef { cart_id }),
        }
    }
}
