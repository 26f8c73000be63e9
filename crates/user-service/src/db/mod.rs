//! User persistence.
//!
//! # Database: `emporium_users`
//!
//! ## Tables
//!
//! - `users` - one row per user, `user_id` is a `SERIAL`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/user-service/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate user
//! ```

mod memory;
mod postgres;

use async_trait::async_trait;
use emporium_core::UserId;
use emporium_runtime::RepositoryError;

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

use crate::models::{NewUser, User};

/// Storage for users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return it with its assigned id.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Fetch a user. Absent is `Ok(None)`.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// All users in ascending id order.
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Replace every attribute of an existing user.
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown.
    async fn update(&self, user: User) -> Result<User, RepositoryError>;

    /// Delete a user. Deleting an unknown id succeeds.
    async fn delete_by_id(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
