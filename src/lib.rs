//! commerce-seed run driver.
//!
//! A run has two independent phases. The source phase provisions the
//! normalized schema and seeds it stage by stage in strict dependency order
//! (users and products, then orders, then order items), each stage persisted
//! in one transaction and its sink-assigned ids folded back before the next
//! stage links against it. The warehouse phase provisions the staging
//! schemas on a separate connection. A failure in either phase aborts the
//! run; warehouse failure never undoes committed source seeding.

pub mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use seed_core::model::{assign_sequential_ids, TableRecord};
use seed_core::{ConstraintViolation, Order, ParentRef, Product, User};
use seed_generator::SeedGenerator;
use seed_postgresql::{provision, BatchWriter, ConnParams};
use std::collections::HashMap;
use tracing::{debug, info};

/// Generation knobs for one seeding run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub users: usize,
    pub products: usize,
    pub orders: usize,
    pub seed: u64,
    pub batch_size: usize,
    pub dry_run: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            users: 100,
            products: 50,
            orders: 500,
            seed: 42,
            batch_size: 100,
            dry_run: false,
        }
    }
}

/// Where a stage's rows go: the transactional batch writer, or nowhere in
/// dry-run mode, where sequential ids stand in for the sink's so later
/// stages still link.
enum StageSink {
    Postgres(BatchWriter),
    DryRun,
}

impl StageSink {
    async fn persist<R: TableRecord>(&mut self, rows: &mut [R]) -> Result<()> {
        match self {
            StageSink::Postgres(writer) => {
                writer.persist(rows).await?;
            }
            StageSink::DryRun => {
                assign_sequential_ids(rows, 1);
                debug!(
                    table = R::spec().name,
                    rows = rows.len(),
                    "dry-run: would insert"
                );
            }
        }
        Ok(())
    }
}

/// Seed the transactional source database and return the operator summary.
pub async fn seed_source(params: &ConnParams, config: &RunConfig) -> Result<report::SeedSummary> {
    let mut sink = if config.dry_run {
        info!("dry-run: skipping source connection and provisioning");
        StageSink::DryRun
    } else {
        let client = params
            .connect()
            .await
            .context("failed to connect to the source database")?;
        provision::provision_source(&client)
            .await
            .context("failed to provision the source schema")?;
        StageSink::Postgres(BatchWriter::new(client).with_batch_size(config.batch_size))
    };

    let mut generator = SeedGenerator::new(config.seed);
    let horizon = generator.horizon();

    info!(count = config.users, "generating users");
    let mut users = generator.generate_users(config.users)?;
    for user in &users {
        user.validate(&horizon)?;
    }
    sink.persist(&mut users).await?;
    let user_refs = parent_refs(&users, User::parent_ref)?;

    info!(count = config.products, "generating products");
    let mut products = generator.generate_products(config.products)?;
    for product in &products {
        product.validate(&horizon)?;
    }
    sink.persist(&mut products).await?;
    let product_refs = parent_refs(&products, Product::parent_ref)?;

    info!(count = config.orders, "generating orders");
    let mut orders = generator.generate_orders(&user_refs, config.orders)?;
    let user_created = created_index(&user_refs);
    for order in &orders {
        let parent_created = lookup_created(&user_created, order.user_id, "orders", "user")?;
        order.validate(parent_created, &horizon)?;
    }
    sink.persist(&mut orders).await?;
    let order_refs = parent_refs(&orders, Order::parent_ref)?;

    info!("generating order items");
    let mut items = generator.generate_order_items(&order_refs, &product_refs);
    let order_created = created_index(&order_refs);
    let product_created = created_index(&product_refs);
    for item in &items {
        let order_at = lookup_created(&order_created, item.order_id, "order_items", "order")?;
        let product_at =
            lookup_created(&product_created, item.product_id, "order_items", "product")?;
        item.validate(order_at, product_at)?;
    }
    sink.persist(&mut items).await?;

    let summary = match &sink {
        StageSink::Postgres(writer) => report::read_summary(writer.client()).await?,
        StageSink::DryRun => report::in_memory_summary(&users, &products, &orders, &items),
    };
    info!("source seeding complete");
    Ok(summary)
}

/// Provision the warehouse staging schemas on their own connection.
pub async fn provision_warehouse(params: &ConnParams) -> Result<()> {
    let client = params
        .connect()
        .await
        .context("failed to connect to the warehouse database")?;
    provision::provision_warehouse(&client)
        .await
        .context("failed to provision the warehouse staging schemas")?;
    Ok(())
}

fn parent_refs<R, F>(rows: &[R], to_ref: F) -> Result<Vec<ParentRef>>
where
    F: Fn(&R) -> std::result::Result<ParentRef, ConstraintViolation>,
{
    let refs = rows
        .iter()
        .map(to_ref)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(refs)
}

fn created_index(refs: &[ParentRef]) -> HashMap<i32, DateTime<Utc>> {
    refs.iter().map(|r| (r.id, r.created_at)).collect()
}

fn lookup_created(
    index: &HashMap<i32, DateTime<Utc>>,
    id: i32,
    entity: &'static str,
    parent: &str,
) -> Result<DateTime<Utc>> {
    index.get(&id).copied().ok_or_else(|| {
        ConstraintViolation::new(entity, format!("row references unknown {parent} id {id}")).into()
    })
}
