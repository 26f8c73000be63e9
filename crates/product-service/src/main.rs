//! Emporium Product Service binary (port 8500).

#![cfg_attr(not(test), forbid(unsafe_code))]

use emporium_discovery::registry_from_url;
use emporium_runtime::{ServiceConfig, StorageBackend, create_pool, serve, telemetry};
use emporium_product_service::{AppState, DEFAULT_PORT, SERVICE_NAME, app};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config =
        ServiceConfig::from_env(SERVICE_NAME, DEFAULT_PORT).expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config, sentry::release_name!());

    telemetry::init_tracing(
        config.log_format,
        "emporium_product_service=info,emporium_runtime=info,tower_http=debug",
    );

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p emporium-cli -- migrate product
    let state = match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            AppState::in_memory()
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .expect("Database URL is required for the postgres store");
            let pool = create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");
            AppState::postgres(pool)
        }
    };

    let registry =
        registry_from_url(config.registry_url.as_deref()).expect("Invalid REGISTRY_URL");

    serve(&config, app(state), registry)
        .await
        .expect("Server error");
}
