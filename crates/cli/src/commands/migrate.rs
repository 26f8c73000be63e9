//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! emporium migrate user
//! emporium migrate product
//! emporium migrate order
//! emporium migrate all
//! ```
//!
//! # Environment Variables
//!
//! - `USER_SERVICE_DATABASE_URL`, `PRODUCT_SERVICE_DATABASE_URL`,
//!   `ORDER_SERVICE_DATABASE_URL` - one `PostgreSQL` database per service
//! - `DATABASE_URL` - fallback for any service without its own
//!
//! # Migration Files
//!
//! Each service embeds its own `migrations/` directory:
//! ```text
//! crates/user-service/migrations/
//! crates/product-service/migrations/
//! crates/order-service/migrations/
//! ```

use emporium_runtime::{ConfigError, ServiceConfig, create_pool};
use sqlx::migrate::{MigrateError, Migrator};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while migrating a service database.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0} is configured for in-memory storage; nothing to migrate")]
    NoDatabase(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),
}

/// A service whose database can be migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    User,
    Product,
    Order,
}

impl Target {
    pub const ALL: [Self; 3] = [Self::User, Self::Product, Self::Order];

    const fn service(self) -> &'static str {
        match self {
            Self::User => emporium_user_service::SERVICE_NAME,
            Self::Product => emporium_product_service::SERVICE_NAME,
            Self::Order => emporium_order_service::SERVICE_NAME,
        }
    }

    const fn default_port(self) -> u16 {
        match self {
            Self::User => emporium_user_service::DEFAULT_PORT,
            Self::Product => emporium_product_service::DEFAULT_PORT,
            Self::Order => emporium_order_service::DEFAULT_PORT,
        }
    }

    fn migrator(self) -> &'static Migrator {
        match self {
            Self::User => &emporium_user_service::MIGRATOR,
            Self::Product => &emporium_product_service::MIGRATOR,
            Self::Order => &emporium_order_service::MIGRATOR,
        }
    }
}

/// Run the pending migrations of one service.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails.
pub async fn run(target: Target) -> Result<(), MigrationError> {
    let service = target.service();
    let config = ServiceConfig::from_env(service, target.default_port())?;
    let database_url = config
        .database_url
        .as_ref()
        .ok_or(MigrationError::NoDatabase(service))?;

    info!(service, "Connecting to database...");
    let pool = create_pool(database_url).await?;

    let migrator = target.migrator();
    info!(service, migrations = migrator.iter().count(), "Running migrations...");
    migrator.run(&pool).await?;

    pool.close().await;
    info!(service, "Migrations complete");
    Ok(())
}

/// Migrate every service in turn, stopping at the first failure.
///
/// # Errors
///
/// See [`run`].
pub async fn all() -> Result<(), MigrationError> {
    for target in Target::ALL {
        run(target).await?;
    }
    Ok(())
}
