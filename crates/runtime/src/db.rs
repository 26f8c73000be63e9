//! Storage primitives shared by every service.
//!
//! Each service owns its own database. Migrations live in
//! `crates/<service>/migrations/` and run via:
//! ```bash
//! cargo run -p emporium-cli -- migrate all
//! ```
//!
//! For local development and tests a service can run on [`MemoryTable`]
//! instead of `PostgreSQL`.

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., negative quantity).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Whether the store itself is unreachable, as opposed to the request
    /// being wrong.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }

    /// Map unique and check violations to `Conflict`, everything else to
    /// `Database`.
    #[must_use]
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && (db_err.is_unique_violation() || db_err.is_check_violation())
        {
            return Self::Conflict(db_err.message().to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// An in-process table keyed by a serial `i32` id.
///
/// Ids start at 1, increase monotonically and are never reused, matching a
/// `SERIAL` column. Rows come back in ascending id order.
#[derive(Debug)]
pub struct MemoryTable<T> {
    state: RwLock<TableState<T>>,
}

#[derive(Debug)]
struct TableState<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryTable<T> {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RwLock::const_new(TableState {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl<T: Clone> MemoryTable<T> {
    /// Allocate the next id, build the row from it and store it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id space is exhausted.
    pub async fn insert_with<F>(&self, build: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(i32) -> T,
    {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Conflict("id sequence exhausted".to_owned()))?;

        let row = build(id);
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Fetch one row.
    pub async fn get(&self, id: i32) -> Option<T> {
        self.state.read().await.rows.get(&id).cloned()
    }

    /// All rows in ascending id order.
    pub async fn all(&self) -> Vec<T> {
        self.state.read().await.rows.values().cloned().collect()
    }

    /// Rows matching `predicate`, in ascending id order.
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.state
            .read()
            .await
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Replace an existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row has this id.
    pub async fn replace(&self, id: i32, row: T) -> Result<T, RepositoryError> {
        let mut state = self.state.write().await;
        let slot = state.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        *slot = row.clone();
        Ok(row)
    }

    /// Remove a row. Returns whether it existed.
    pub async fn remove(&self, id: i32) -> bool {
        self.state.write().await.rows.remove(&id).is_some()
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    /// Whether the table has no rows.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }
}
