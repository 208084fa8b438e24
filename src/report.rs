//! Operator-facing seeding summary.
//!
//! Informational stdout output, not a machine-readable contract.

use anyhow::Result;
use chrono::{DateTime, Utc};
use seed_core::schema::ALL_TABLES;
use seed_core::{Order, OrderItem, Product, User};
use seed_postgresql::source;
use tokio_postgres::Client;

/// Row counts per table plus the order creation range.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub table_counts: Vec<(&'static str, i64)>,
    pub order_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

/// Read the summary back from the seeded database.
pub async fn read_summary(client: &Client) -> Result<SeedSummary> {
    let mut table_counts = Vec::with_capacity(ALL_TABLES.len());
    for spec in ALL_TABLES {
        table_counts.push((spec.name, source::table_count(client, spec).await?));
    }
    let order_range = source::order_created_range(client).await?;
    Ok(SeedSummary {
        table_counts,
        order_range,
    })
}

/// Build the summary from in-memory rows (dry-run mode).
pub fn in_memory_summary(
    users: &[User],
    products: &[Product],
    orders: &[Order],
    items: &[OrderItem],
) -> SeedSummary {
    let created: Vec<_> = orders.iter().map(|o| o.created_at).collect();
    let order_range = created
        .iter()
        .min()
        .copied()
        .zip(created.iter().max().copied());
    SeedSummary {
        table_counts: vec![
            ("users", users.len() as i64),
            ("products", products.len() as i64),
            ("orders", orders.len() as i64),
            ("order_items", items.len() as i64),
        ],
        order_range,
    }
}

/// Print the human-readable report.
pub fn print_summary(summary: &SeedSummary) {
    println!();
    println!("{}", "=".repeat(50));
    println!("DATABASE SEEDING SUMMARY");
    println!("{}", "=".repeat(50));
    for (table, count) in &summary.table_counts {
        println!("{:<20}: {:>6} rows", table.to_uppercase(), count);
    }
    if let Some((from, to)) = summary.order_range {
        println!();
        println!("{}", "-".repeat(50));
        println!("Orders date range:");
        println!("  From: {from}");
        println!("  To:   {to}");
    }
    println!("{}", "=".repeat(50));
    println!();
}
