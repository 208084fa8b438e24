//! Core data model for the commerce-seed fixture generator.
//!
//! This crate defines the entity types (users, products, orders, order
//! items), the generation horizon, and the static table descriptors that the
//! generator and the PostgreSQL sink share. It carries no database or RNG
//! dependency: entities are plain values that lower themselves into ordered
//! [`SqlValue`] rows via the [`TableRecord`] trait, and every physical table
//! is described by a fixed [`TableSpec`] const that doubles as the
//! identifier allow-list for SQL built elsewhere.

pub mod horizon;
pub mod model;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use horizon::{Horizon, DEFAULT_HORIZON_DAYS};
pub use model::{
    ConstraintViolation, Order, OrderItem, OrderStatus, ParentRef, Product, TableRecord, User,
};
pub use schema::{ColumnSpec, SqlType, TableSpec};
pub use values::SqlValue;
