//! Entity types and their invariants.
//!
//! Entities are constructed in memory with `id: None`, validated, persisted,
//! and only then carry the sink-assigned surrogate id. Once a row has been
//! handed to the next stage as a [`ParentRef`] it is never mutated again.

use crate::horizon::Horizon;
use crate::schema::{self, TableSpec};
use crate::values::SqlValue;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// The fixed product category set.
pub const CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
    "Toys",
    "Food & Beverage",
    "Beauty",
];

/// Inclusive price bounds for generated products.
pub const MIN_PRICE_CENTS: i64 = 500;
pub const MAX_PRICE_CENTS: i64 = 50_000;

/// A generated row failed an invariant. Defensive: the generation
/// algorithms uphold every invariant by construction, so seeing this error
/// means a generator bug, not bad input data.
#[derive(Debug, thiserror::Error)]
#[error("constraint violation in {entity}: {detail}")]
pub struct ConstraintViolation {
    pub entity: &'static str,
    pub detail: String,
}

impl ConstraintViolation {
    pub fn new(entity: &'static str, detail: impl Into<String>) -> Self {
        Self {
            entity,
            detail: detail.into(),
        }
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in the order they are sampled.
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ConstraintViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ConstraintViolation::new(
                "orders",
                format!("unknown status {other:?}"),
            )),
        }
    }
}

/// An already-persisted parent row, reduced to what dependent stages need:
/// its surrogate id and its creation instant. Stages hand these forward
/// explicitly instead of re-reading persisted rows mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

impl ParentRef {
    pub fn new(id: i32, created_at: DateTime<Utc>) -> Self {
        Self { id, created_at }
    }
}

/// A row that knows which physical table it belongs to and how to lower
/// itself into ordered cell values matching that table's [`TableSpec`].
pub trait TableRecord {
    /// The table this record persists into.
    fn spec() -> &'static TableSpec;

    /// Cell values in `spec().columns` order, excluding the surrogate key.
    fn values(&self) -> Vec<SqlValue>;

    /// The sink-assigned id, if the row has been persisted.
    fn id(&self) -> Option<i32>;

    /// Backfill the sink-assigned id after a successful persist.
    fn set_id(&mut self, id: i32);
}

/// Fold sink-returned ids back into the rows they were assigned for.
pub fn backfill_ids<R: TableRecord>(rows: &mut [R], ids: &[i32]) -> Result<(), ConstraintViolation> {
    if rows.len() != ids.len() {
        return Err(ConstraintViolation::new(
            R::spec().name,
            format!("sink returned {} ids for {} rows", ids.len(), rows.len()),
        ));
    }
    for (row, id) in rows.iter_mut().zip(ids) {
        row.set_id(*id);
    }
    Ok(())
}

/// Assign sequential ids starting at `start`, for runs that never touch a
/// sink (dry-run mode and in-memory scenario tests).
pub fn assign_sequential_ids<R: TableRecord>(rows: &mut [R], start: i32) {
    for (offset, row) in rows.iter_mut().enumerate() {
        row.set_id(start + offset as i32);
    }
}

fn check_lifecycle(
    entity: &'static str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    horizon: &Horizon,
) -> Result<(), ConstraintViolation> {
    if updated_at < created_at {
        return Err(ConstraintViolation::new(
            entity,
            format!("updated_at {updated_at} precedes created_at {created_at}"),
        ));
    }
    if let Some(deleted_at) = deleted_at {
        if deleted_at < updated_at {
            return Err(ConstraintViolation::new(
                entity,
                format!("deleted_at {deleted_at} precedes updated_at {updated_at}"),
            ));
        }
    }
    for at in [Some(created_at), Some(updated_at), deleted_at]
        .into_iter()
        .flatten()
    {
        if !horizon.contains(at) {
            return Err(ConstraintViolation::new(
                entity,
                format!("timestamp {at} falls outside the generation horizon"),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Reduce to a parent candidate for order generation.
    pub fn parent_ref(&self) -> Result<ParentRef, ConstraintViolation> {
        match self.id {
            Some(id) => Ok(ParentRef::new(id, self.created_at)),
            None => Err(ConstraintViolation::new(
                "users",
                "row referenced as a parent before an id was assigned",
            )),
        }
    }

    pub fn validate(&self, horizon: &Horizon) -> Result<(), ConstraintViolation> {
        check_lifecycle(
            "users",
            self.created_at,
            self.updated_at,
            self.deleted_at,
            horizon,
        )
    }
}

impl TableRecord for User {
    fn spec() -> &'static TableSpec {
        &schema::USERS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.email.clone().into(),
            self.address.clone().into(),
            self.created_at.into(),
            self.updated_at.into(),
            self.deleted_at.into(),
        ]
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Option<i32>,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Reduce to a parent candidate for order-item generation.
    pub fn parent_ref(&self) -> Result<ParentRef, ConstraintViolation> {
        match self.id {
            Some(id) => Ok(ParentRef::new(id, self.created_at)),
            None => Err(ConstraintViolation::new(
                "products",
                "row referenced as a parent before an id was assigned",
            )),
        }
    }

    pub fn validate(&self, horizon: &Horizon) -> Result<(), ConstraintViolation> {
        check_lifecycle(
            "products",
            self.created_at,
            self.updated_at,
            self.deleted_at,
            horizon,
        )?;
        if !CATEGORIES.contains(&self.category.as_str()) {
            return Err(ConstraintViolation::new(
                "products",
                format!("category {:?} is not in the fixed set", self.category),
            ));
        }
        let min = Decimal::new(MIN_PRICE_CENTS, 2);
        let max = Decimal::new(MAX_PRICE_CENTS, 2);
        if self.price < min || self.price > max {
            return Err(ConstraintViolation::new(
                "products",
                format!("price {} outside [{min}, {max}]", self.price),
            ));
        }
        Ok(())
    }
}

impl TableRecord for Product {
    fn spec() -> &'static TableSpec {
        &schema::PRODUCTS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.name.clone().into(),
            self.category.clone().into(),
            self.price.into(),
            self.created_at.into(),
            self.updated_at.into(),
            self.deleted_at.into(),
        ]
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Option<i32>,
    pub user_id: i32,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Reduce to a parent candidate for order-item generation.
    pub fn parent_ref(&self) -> Result<ParentRef, ConstraintViolation> {
        match self.id {
            Some(id) => Ok(ParentRef::new(id, self.created_at)),
            None => Err(ConstraintViolation::new(
                "orders",
                "row referenced as a parent before an id was assigned",
            )),
        }
    }

    /// `user_created_at` is the creation instant of the referenced user.
    pub fn validate(
        &self,
        user_created_at: DateTime<Utc>,
        horizon: &Horizon,
    ) -> Result<(), ConstraintViolation> {
        if self.created_at <= user_created_at {
            return Err(ConstraintViolation::new(
                "orders",
                format!(
                    "created_at {} does not strictly follow user created_at {user_created_at}",
                    self.created_at
                ),
            ));
        }
        if self.updated_at < self.created_at {
            return Err(ConstraintViolation::new(
                "orders",
                format!(
                    "updated_at {} precedes created_at {}",
                    self.updated_at, self.created_at
                ),
            ));
        }
        if self.status == OrderStatus::Pending && self.updated_at != self.created_at {
            return Err(ConstraintViolation::new(
                "orders",
                "pending order has an update lag",
            ));
        }
        for at in [self.created_at, self.updated_at] {
            if !horizon.contains(at) {
                return Err(ConstraintViolation::new(
                    "orders",
                    format!("timestamp {at} falls outside the generation horizon"),
                ));
            }
        }
        Ok(())
    }
}

impl TableRecord for Order {
    fn spec() -> &'static TableSpec {
        &schema::ORDERS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_id.into(),
            self.status.as_str().into(),
            self.created_at.into(),
            self.updated_at.into(),
        ]
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Option<i32>,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl OrderItem {
    /// `order_created_at` / `product_created_at` are the creation instants
    /// of the referenced parent order and product.
    pub fn validate(
        &self,
        order_created_at: DateTime<Utc>,
        product_created_at: DateTime<Utc>,
    ) -> Result<(), ConstraintViolation> {
        if product_created_at >= order_created_at {
            return Err(ConstraintViolation::new(
                "order_items",
                format!(
                    "product created_at {product_created_at} does not strictly precede order created_at {order_created_at}"
                ),
            ));
        }
        if !(1..=10).contains(&self.quantity) {
            return Err(ConstraintViolation::new(
                "order_items",
                format!("quantity {} outside [1, 10]", self.quantity),
            ));
        }
        Ok(())
    }
}

impl TableRecord for OrderItem {
    fn spec() -> &'static TableSpec {
        &schema::ORDER_ITEMS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.order_id.into(),
            self.product_id.into(),
            self.quantity.into(),
        ]
    }

    fn id(&self) -> Option<i32> {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = Some(id);
    }
}
