//! Application state shared across handlers.

use std::sync::Arc;

use async_trait::async_trait;
use emporium_runtime::{Readiness, RepositoryError};
use sqlx::PgPool;

use crate::db::{MemoryUserRepository, PgUserRepository, UserRepository};
use crate::service::UserService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repo: Arc<dyn UserRepository>,
    users: UserService,
}

impl AppState {
    /// Build state over any repository.
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        let users = UserService::new(Arc::clone(&repo));
        Self {
            inner: Arc::new(AppStateInner { repo, users }),
        }
    }

    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PgUserRepository::new(pool)))
    }

    /// State backed by an empty in-process table.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryUserRepository::new()))
    }

    /// Get a reference to the user service.
    #[must_use]
    pub fn users(&self) -> &UserService {
        &self.inner.users
    }
}

#[async_trait]
impl Readiness for AppState {
    async fn ready(&self) -> Result<(), RepositoryError> {
        self.inner.repo.ping().await
    }
}
