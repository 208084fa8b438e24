//! Error types for the PostgreSQL sink.

use thiserror::Error;

/// Errors that can occur while provisioning or writing.
#[derive(Error, Debug)]
pub enum SinkError {
    /// PostgreSQL connection or query error. Any failure during a batch
    /// write rolls the stage's transaction back before this surfaces.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// Missing or invalid connection parameters; fatal before any writes.
    #[error("configuration error: {0}")]
    Config(String),

    /// A row or descriptor failed a sanity check on its way to the sink.
    #[error(transparent)]
    Constraint(#[from] seed_core::ConstraintViolation),
}
