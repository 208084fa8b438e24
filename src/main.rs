//! Command-line interface for commerce-seed.
//!
//! # Usage Examples
//!
//! ```bash
//! # Provision and seed with the local docker-compose defaults
//! commerce-seed
//!
//! # Larger dataset, explicit seed
//! commerce-seed --users 1000 --products 200 --orders 5000 --seed 7
//!
//! # Point at other databases via flags or environment
//! SOURCE_DB_HOST=db.internal DWH_DB_HOST=dwh.internal commerce-seed
//!
//! # Generate and validate without touching any database
//! commerce-seed --dry-run
//! ```

use anyhow::Context;
use clap::Parser;
use commerce_seed::{provision_warehouse, report, seed_source, RunConfig};
use seed_postgresql::{SourceDbOpts, WarehouseDbOpts};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "commerce-seed")]
#[command(about = "Provisions and seeds a causally consistent synthetic e-commerce dataset")]
#[command(long_about = None)]
struct Cli {
    /// Number of users to generate
    #[arg(long, default_value = "100")]
    users: usize,

    /// Number of products to generate
    #[arg(long, default_value = "50")]
    products: usize,

    /// Number of orders to generate
    #[arg(long, default_value = "500")]
    orders: usize,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Batch size for database inserts
    #[arg(long, default_value = "100")]
    batch_size: usize,

    /// Dry-run mode: generate and validate without database operations
    #[arg(long)]
    dry_run: bool,

    /// Transactional source database connection options
    #[command(flatten)]
    source: SourceDbOpts,

    /// Warehouse database connection options
    #[command(flatten)]
    warehouse: WarehouseDbOpts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "commerce_seed=info,seed_postgresql=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = RunConfig {
        users: cli.users,
        products: cli.products,
        orders: cli.orders,
        seed: cli.seed,
        batch_size: cli.batch_size,
        dry_run: cli.dry_run,
    };

    info!("starting database seeding");
    let summary = seed_source(&cli.source.params(), &config)
        .await
        .context("source seeding failed")?;
    report::print_summary(&summary);

    if config.dry_run {
        info!("dry-run: skipping warehouse provisioning");
        return Ok(());
    }

    provision_warehouse(&cli.warehouse.params())
        .await
        .context("warehouse provisioning failed")?;
    info!("seeding run complete");
    Ok(())
}
