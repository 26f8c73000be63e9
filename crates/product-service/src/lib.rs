//! Emporium Product Service.
//!
//! Owns the product catalogue (title, SKU, unit price, stock quantity, image
//! URL) and exposes it as a JSON CRUD resource at `/api/products`. Listing
//! accepts an exact-match `?sku=` filter.
//!
//! Stock can never go negative: the service rejects negative quantities and
//! prices with 400 before anything is stored, and the `products` table carries
//! matching `CHECK` constraints.

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
pub const SERVICE_NAME: &str = "product-service";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8500;

/// Migrations for the `products` table.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The complete router, health endpoints included.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(routes::routes())
        .with_state(state)
}
