//! Shared runtime for the Emporium services.
//!
//! Every service binary is the same shape: load a [`ServiceConfig`] from the
//! environment, initialize Sentry and tracing, pick a store, build an axum
//! router and hand it to [`server::serve`]. This crate owns everything in that
//! sequence that is not specific to users, products or orders.
//!
//! # Layers
//!
//! ```text
//! repository  -> RepositoryError
//! service     -> ServiceError
//! HTTP        -> ApiError (IntoResponse, JSON ErrorBody)
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod middleware;
pub mod server;
pub mod telemetry;

pub use config::{ConfigError, LogFormat, SentryConfig, ServiceConfig, StorageBackend};
pub use db::{MemoryTable, RepositoryError, create_pool};
pub use error::{ApiError, ServiceError};
pub use health::{Readiness, health_routes};
pub use server::{serve, shutdown_signal};
