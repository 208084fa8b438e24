//! Idempotent, destructive schema provisioning.
//!
//! `provision_source` rebuilds the four normalized relations the seeder
//! writes into; `provision_warehouse` rebuilds the two staging variants of
//! each (an append-only ingest table carrying the batch tag, and a keyed
//! current-snapshot table without it). Both drop before creating, so a
//! second run in a row lands on the same empty schema. Fixture
//! (re)initialization only, never incremental runs.

use crate::error::SinkError;
use seed_core::schema::{TableSpec, ALL_TABLES};
use seed_core::SqlType;
use tokio_postgres::Client;
use tracing::{debug, info};

/// Warehouse schema for append-only ingest tables (with batch tag).
pub const INGEST_SCHEMA: &str = "raw_ingest";

/// Warehouse schema for keyed current-snapshot tables (no batch tag).
pub const CURRENT_SCHEMA: &str = "raw_current";

const SOURCE_DROP: &str = "\
    DROP TABLE IF EXISTS order_items CASCADE;\n\
    DROP TABLE IF EXISTS orders CASCADE;\n\
    DROP TABLE IF EXISTS products CASCADE;\n\
    DROP TABLE IF EXISTS users CASCADE;";

const CREATE_USERS: &str = "\
    CREATE TABLE users (\n\
        id SERIAL PRIMARY KEY,\n\
        name VARCHAR(255) NOT NULL,\n\
        email VARCHAR(255) UNIQUE NOT NULL,\n\
        address TEXT,\n\
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
        deleted_at TIMESTAMP WITH TIME ZONE\n\
    )";

const CREATE_PRODUCTS: &str = "\
    CREATE TABLE products (\n\
        id SERIAL PRIMARY KEY,\n\
        name VARCHAR(255) NOT NULL,\n\
        category VARCHAR(100),\n\
        price DECIMAL(10, 2) NOT NULL,\n\
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
        deleted_at TIMESTAMP WITH TIME ZONE\n\
    )";

const CREATE_ORDERS: &str = "\
    CREATE TABLE orders (\n\
        id SERIAL PRIMARY KEY,\n\
        user_id INTEGER NOT NULL REFERENCES users(id),\n\
        status VARCHAR(50) NOT NULL,\n\
        created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
        updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP\n\
    )";

const CREATE_ORDER_ITEMS: &str = "\
    CREATE TABLE order_items (\n\
        id SERIAL PRIMARY KEY,\n\
        order_id INTEGER NOT NULL REFERENCES orders(id),\n\
        product_id INTEGER NOT NULL REFERENCES products(id),\n\
        quantity INTEGER NOT NULL\n\
    )";

/// The full source DDL set: drop everything, then recreate parents before
/// children.
pub fn source_statements() -> [&'static str; 5] {
    [
        SOURCE_DROP,
        CREATE_USERS,
        CREATE_PRODUCTS,
        CREATE_ORDERS,
        CREATE_ORDER_ITEMS,
    ]
}

/// Drop-and-recreate the normalized source relations.
pub async fn provision_source(client: &Client) -> Result<(), SinkError> {
    for statement in source_statements() {
        debug!(ddl = statement, "executing");
        client.batch_execute(statement).await?;
    }
    info!("source schema provisioned");
    Ok(())
}

/// DROP statement for one staging table.
pub fn staging_drop_sql(schema: &str, spec: &TableSpec) -> String {
    format!("DROP TABLE IF EXISTS {schema}.{} CASCADE", spec.name)
}

/// CREATE statement for one staging table: no constraints, no defaults,
/// same column shapes as the source relation, an INTEGER id instead of a
/// SERIAL key, and optionally the leading batch tag.
pub fn staging_create_sql(schema: &str, spec: &TableSpec, with_batch_id: bool) -> String {
    let mut columns: Vec<String> = Vec::with_capacity(spec.columns.len() + 2);
    if with_batch_id {
        columns.push(format!("batch_id {}", SqlType::Char(8).ddl()));
    }
    columns.push(format!("{} {}", spec.primary_key, SqlType::Integer.ddl()));
    for column in spec.columns {
        columns.push(format!("{} {}", column.name, column.sql_type.ddl()));
    }
    format!(
        "CREATE TABLE {schema}.{} (\n    {}\n)",
        spec.name,
        columns.join(",\n    "),
    )
}

/// Drop-and-recreate both warehouse staging schemas.
pub async fn provision_warehouse(client: &Client) -> Result<(), SinkError> {
    for schema in [INGEST_SCHEMA, CURRENT_SCHEMA] {
        client
            .batch_execute(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
            .await?;
        // Children first so the drops never trip over each other.
        for spec in ALL_TABLES.iter().rev() {
            let drop = staging_drop_sql(schema, spec);
            debug!(ddl = drop.as_str(), "executing");
            client.batch_execute(&drop).await?;
        }
    }

    for spec in ALL_TABLES {
        let create = staging_create_sql(INGEST_SCHEMA, spec, true);
        debug!(ddl = create.as_str(), "executing");
        client.batch_execute(&create).await?;
    }
    for spec in ALL_TABLES {
        let create = staging_create_sql(CURRENT_SCHEMA, spec, false);
        debug!(ddl = create.as_str(), "executing");
        client.batch_execute(&create).await?;
    }

    info!("warehouse staging schemas provisioned");
    Ok(())
}
