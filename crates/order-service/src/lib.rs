//! Emporium Order Service.
//!
//! Records orders (date, description, cart reference) and exposes them as a
//! JSON CRUD resource at `/api/orders`.
//!
//! The cart reference is opaque: nothing checks that the cart exists, and the
//! service never calls the user or product services. Orders created without
//! a date are stamped with the current UTC time.

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
pub const SERVICE_NAME: &str = "order-service";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8300;

/// Migrations for the `orders` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The complete router, health endpoints included.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(routes::routes())
        .with_state(state)
}
