//! Emporium User Service.
//!
//! Owns user records (first name, last name, email, phone) in its own store
//! and exposes them as a JSON CRUD resource at `/api/users`.
//!
//! ```text
//! routes (axum) -> UserService -> UserRepository (PostgreSQL | memory)
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;

use axum::Router;
use emporium_runtime::health_routes;

pub use state::AppState;

/// Logical name used for configuration and registration.
pub const SERVICE_NAME: &str = "user-service";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8700;

/// Migrations for the `users` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The complete router, health endpoints included.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(routes::routes())
        .with_state(state)
}
