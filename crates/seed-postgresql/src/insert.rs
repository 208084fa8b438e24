//! Generic multi-row INSERT built from table descriptors.
//!
//! SQL text is only ever assembled from [`seed_core::schema`] consts, and
//! the descriptor is re-checked against the allow-list before any statement
//! is built. Values travel as boxed `ToSql` trait objects so one routine
//! serves every table.

use crate::error::SinkError;
use seed_core::schema::{self, TableSpec};
use seed_core::{ConstraintViolation, SqlValue};
use tokio_postgres::types::ToSql;
use tokio_postgres::Transaction;

/// Default number of rows per INSERT statement.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Build a multi-row `INSERT ... RETURNING <pk>` statement for `row_count`
/// rows of `spec`'s non-key columns.
pub fn build_insert_sql(spec: &TableSpec, row_count: usize) -> String {
    let col_count = spec.columns.len();
    let mut placeholders: Vec<String> = Vec::with_capacity(row_count);
    let mut param_idx = 1;

    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..col_count)
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO \"{}\" ({}) VALUES {} RETURNING \"{}\"",
        spec.name,
        spec.columns
            .iter()
            .map(|c| format!("\"{}\"", c.name))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", "),
        spec.primary_key,
    )
}

/// Insert a batch of rows and return the sink-assigned ids in input order.
pub async fn insert_returning_ids(
    tx: &Transaction<'_>,
    spec: &'static TableSpec,
    rows: &[Vec<SqlValue>],
) -> Result<Vec<i32>, SinkError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    if schema::lookup(spec.name).is_none() {
        return Err(ConstraintViolation::new(
            spec.name,
            "table is not in the fixed descriptor set",
        )
        .into());
    }
    spec.validate_identifiers()?;
    for row in rows {
        if row.len() != spec.columns.len() {
            return Err(ConstraintViolation::new(
                spec.name,
                format!(
                    "row carries {} values for {} columns",
                    row.len(),
                    spec.columns.len()
                ),
            )
            .into());
        }
    }

    let sql = build_insert_sql(spec, rows.len());

    let params: Vec<Box<dyn ToSql + Sync + Send>> = rows
        .iter()
        .flat_map(|row| row.iter().cloned().map(to_sql_param))
        .collect();
    let param_refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p| p.as_ref() as &(dyn ToSql + Sync))
        .collect();

    let returned = tx.query(&sql, &param_refs).await?;
    Ok(returned.iter().map(|row| row.get(0)).collect())
}

/// Convert a cell value to a boxed ToSql trait object.
fn to_sql_param(value: SqlValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::Int4(v) => Box::new(v),
        SqlValue::Text(v) => Box::new(v),
        SqlValue::Decimal(v) => Box::new(v),
        SqlValue::TimestampTz(v) => Box::new(v),
        SqlValue::NullableTimestampTz(v) => Box::new(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_insert_sql_single_row() {
        let sql = build_insert_sql(&schema::ORDER_ITEMS, 1);
        assert_eq!(
            sql,
            "INSERT INTO \"order_items\" (\"order_id\", \"product_id\", \"quantity\") \
             VALUES ($1, $2, $3) RETURNING \"id\""
        );
    }

    #[test]
    fn test_build_insert_sql_numbers_rows_consecutively() {
        let sql = build_insert_sql(&schema::ORDERS, 3);
        assert!(sql.starts_with("INSERT INTO \"orders\""));
        assert!(sql.contains("($1, $2, $3, $4), ($5, $6, $7, $8), ($9, $10, $11, $12)"));
        assert!(sql.ends_with("RETURNING \"id\""));
    }

    #[test]
    fn test_build_insert_sql_quotes_all_identifiers() {
        let sql = build_insert_sql(&schema::USERS, 1);
        for column in schema::USERS.columns {
            assert!(sql.contains(&format!("\"{}\"", column.name)));
        }
    }
}
