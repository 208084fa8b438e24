//! Read-back queries for the operator summary.

use crate::error::SinkError;
use chrono::{DateTime, Utc};
use seed_core::schema::{self, TableSpec, ORDERS};
use seed_core::ConstraintViolation;
use tokio_postgres::Client;

/// Number of rows currently in `spec`'s table.
pub async fn table_count(client: &Client, spec: &TableSpec) -> Result<i64, SinkError> {
    if schema::lookup(spec.name).is_none() {
        return Err(ConstraintViolation::new(
            spec.name,
            "table is not in the fixed descriptor set",
        )
        .into());
    }
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", spec.name);
    let row = client.query_one(&sql, &[]).await?;
    Ok(row.get(0))
}

/// Oldest and newest order creation instants, or `None` when no orders
/// exist.
pub async fn order_created_range(
    client: &Client,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, SinkError> {
    let sql = format!(
        "SELECT MIN(\"created_at\"), MAX(\"created_at\") FROM \"{}\"",
        ORDERS.name
    );
    let row = client.query_one(&sql, &[]).await?;
    let min: Option<DateTime<Utc>> = row.get(0);
    let max: Option<DateTime<Utc>> = row.get(1);
    Ok(min.zip(max))
}
