//! PostgreSQL sink for commerce-seed.
//!
//! Three concerns live here: connection configuration (clap args with env
//! overrides and local-default fallbacks), idempotent schema provisioning
//! for the source and warehouse databases, and the transactional batch
//! writer that assigns surrogate ids. Read-back queries for the operator
//! summary are in [`source`].

pub mod connect;
pub mod error;
pub mod insert;
pub mod provision;
pub mod source;
pub mod writer;

// Re-exports for convenience
pub use connect::{ConnParams, SourceDbOpts, WarehouseDbOpts};
pub use error::SinkError;
pub use writer::{BatchId, BatchWriter};
