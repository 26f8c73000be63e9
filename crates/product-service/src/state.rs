//! Application state shared across handlers.

use std::sync::Arc;

use async_trait::async_trait;
use emporium_runtime::{Readiness, RepositoryError};
use sqlx::PgPool;

use crate::db::{MemoryProductRepository, PgProductRepository, ProductRepository};
use crate::service::ProductService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repo: Arc<dyn ProductRepository>,
    products: ProductService,
}

impl AppState {
    /// Build state over any repository.
    #[must_use]
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        let products = ProductService::new(Arc::clone(&repo));
        Self {
            inner: Arc::new(AppStateInner { repo, products }),
        }
    }

    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgProductRepository::new(pool)))
    }

    /// State backed by an empty in-process table.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryProductRepository::new()))
    }

    /// Get a reference to the product service.
    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }
}

#[async_trait]
impl Readiness for AppState {
    async fn ready(&self) -> Result<(), RepositoryError> {
        self.inner.repo.ping().await
    }
}
