use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use emporium_core::{CartId, OrderDate, OrderId};
use emporium_runtime::RepositoryError;
use sqlx::PgPool;

use super::OrderRepository;
use crate::models::{NewOrder, Order};

/// `PostgreSQL`-backed order repository.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    order_id: i32,
    order_date: NaiveDateTime,
    order_desc: Option<String>,
    cart_id: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.order_id),
            order_date: OrderDate::from_naive(row.order_date),
            order_desc: row.order_desc,
            cart_id: row.cart_id.map(CartId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "order_id, order_date, order_desc, cart_id, created_at, updated_at";

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (order_date, order_desc, cart_id)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "
        ))
        .bind(order.order_date.as_naive())
        .bind(order.order_desc)
        .bind(order.cart_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {COLUMNS} FROM orders ORDER BY order_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn update(&self, order: Order) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE orders
            SET order_date = $2, order_desc = $3, cart_id = $4, updated_at = NOW()
            WHERE order_id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(order.id)
        .bind(order.order_date.as_naive())
        .bind(order.order_desc)
        .bind(order.cart_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from_sqlx)?;

        row.map(Order::from).ok_or(RepositoryError::NotFound)
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
