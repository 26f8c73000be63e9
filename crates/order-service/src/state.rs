//! Application state shared across handlers.

use std::sync::Arc;

use async_trait::async_trait;
use emporium_runtime::{Readiness, RepositoryError};
use sqlx::PgPool;

use crate::db::{MemoryOrderRepository, OrderRepository, PgOrderRepository};
use crate::service::OrderService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repo: Arc<dyn OrderRepository>,
    orders: OrderService,
}

impl AppState {
    /// Build state over any repository.
    #[must_use]
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        let orders = OrderService::new(Arc::clone(&repo));
        Self {
            inner: Arc::new(AppStateInner { repo, orders }),
        }
    }

    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgOrderRepository::new(pool)))
    }

    /// State backed by an empty in-process table.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryOrderRepository::new()))
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}

#[async_trait]
impl Readiness for AppState {
    async fn ready(&self) -> Result<(), RepositoryError> {
        self.inner.repo.ping().await
    }
}
