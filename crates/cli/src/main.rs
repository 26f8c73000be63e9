//! Emporium CLI - migrations, seeding and smoke checks.
//!
//! # Usage
//!
//! ```bash
//! # Run one service's database migrations
//! emporium migrate user
//!
//! # Run all database migrations
//! emporium migrate all
//!
//! # Create sample products through the Product Service
//! emporium seed products --count 10
//!
//! # Check which services are up
//! emporium probe
//!
//! # Create a user, a product and an order, then verify them
//! emporium checkout --cart-id 1
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Create sample data through the service APIs
//! - `probe` - Report service health
//! - `checkout` - Run the cross-service order flow

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::migrate::Target;

#[derive(Parser)]
#[command(name = "emporium")]
#[command(author, version, about = "Emporium CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Create sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Report whether each service is up
    Probe,
    /// Run the cross-service order flow
    Checkout {
        /// Order description
        #[arg(short, long, default_value = commands::checkout::DEFAULT_DESCRIPTION)]
        description: String,

        /// Cart id to reference from the order
        #[arg(short, long)]
        cart_id: Option<i32>,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run user-service database migrations
    User,
    /// Run product-service database migrations
    Product,
    /// Run order-service database migrations
    Order,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create sample products
    Products {
        /// Number of products to create
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "emporium_cli=info,emporium_client=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::User => commands::migrate::run(Target::User).await?,
            MigrateTarget::Product => commands::migrate::run(Target::Product).await?,
            MigrateTarget::Order => commands::migrate::run(Target::Order).await?,
            MigrateTarget::All => commands::migrate::all().await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { count } => commands::seed::products(count).await?,
        },
        Commands::Probe => commands::probe::run().await?,
        Commands::Checkout {
            description,
            cart_id,
        } => commands::checkout::run(&description, cart_id).await?,
    }
    Ok(())
}
