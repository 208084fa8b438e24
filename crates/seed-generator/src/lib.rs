//! Deterministic fixture generation for commerce-seed.
//!
//! [`SeedGenerator`] produces the base entities (users, products) and the
//! causally linked dependents (orders, order items). All randomness flows
//! through one `StdRng` seeded at construction, so the same seed and horizon
//! produce identical output regardless of what else the process does.
//!
//! # Architecture
//!
//! ```text
//! SeedGenerator { rng: StdRng, horizon, index }
//!        │
//!        ├─ generate_users / generate_products      (no dependencies)
//!        │
//!        ├─ generate_orders(&[ParentRef], count)    (needs persisted users)
//!        │
//!        └─ generate_order_items(&[ParentRef], &[ParentRef])
//!                                                   (needs persisted orders
//!                                                    and products)
//! ```
//!
//! Parents are passed in as explicit [`seed_core::ParentRef`] slices carrying
//! the sink-assigned id and the creation instant; the generator never reads
//! anything back from storage.

pub mod generator;
pub mod linker;
mod words;

// Re-exports for convenience
pub use generator::{GeneratorError, SeedGenerator};
