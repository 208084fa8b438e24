//! Causal linking: orders onto users, order items onto orders and products.
//!
//! Both relations enforce parent-before-child ordering, but differently.
//! Order timestamps drawn at a window edge are repaired forward past the
//! parent's creation instant; order items only filter product candidates and
//! an order with no eligible product contributes zero items.

use crate::generator::{random_time_of_day, GeneratorError, SeedGenerator};
use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;
use seed_core::{ConstraintViolation, Order, OrderItem, OrderStatus, ParentRef};
use std::cmp;
use std::ops::RangeInclusive;

/// Maximum line items per order.
pub const MAX_ITEMS_PER_ORDER: usize = 5;

/// Inclusive quantity bounds per line item.
pub const QUANTITY_RANGE: RangeInclusive<i32> = 1..=10;

/// How a status constrains its order's placement in the horizon.
struct StatusPolicy {
    /// A parent user must be at least this many days old.
    min_parent_age_days: i64,
    /// Day-offset window (from the horizon start) for created_at.
    window: RangeInclusive<i64>,
    /// Days between created_at and updated_at; `None` means no lag.
    update_lag_days: Option<RangeInclusive<i64>>,
}

impl StatusPolicy {
    fn for_status(status: OrderStatus) -> Self {
        match status {
            // Pending orders are recent (last two weeks).
            OrderStatus::Pending => Self {
                min_parent_age_days: 1,
                window: 76..=90,
                update_lag_days: None,
            },
            // Shipped orders are one to four weeks old.
            OrderStatus::Shipped => Self {
                min_parent_age_days: 5,
                window: 61..=85,
                update_lag_days: Some(1..=5),
            },
            // Settled orders are older (one to eleven weeks).
            OrderStatus::Completed | OrderStatus::Cancelled => Self {
                min_parent_age_days: 15,
                window: 11..=75,
                update_lag_days: Some(5..=15),
            },
        }
    }
}

impl SeedGenerator {
    /// Generate `count` orders against already-persisted users.
    ///
    /// Fails with [`GeneratorError::EligibilityExhausted`] when a drawn
    /// status has no user old enough to carry it.
    pub fn generate_orders(
        &mut self,
        users: &[ParentRef],
        count: usize,
    ) -> Result<Vec<Order>, GeneratorError> {
        let mut orders = Vec::with_capacity(count);
        for _ in 0..count {
            let status = OrderStatus::ALL[self.rng.gen_range(0..OrderStatus::ALL.len())];
            orders.push(self.link_order(users, status)?);
        }
        Ok(orders)
    }

    fn link_order(
        &mut self,
        users: &[ParentRef],
        status: OrderStatus,
    ) -> Result<Order, GeneratorError> {
        let policy = StatusPolicy::for_status(status);
        let cutoff = self.horizon.age_cutoff(policy.min_parent_age_days);

        let eligible: Vec<&ParentRef> = users.iter().filter(|u| u.created_at < cutoff).collect();
        if eligible.is_empty() {
            return Err(GeneratorError::EligibilityExhausted { status });
        }
        let parent = eligible[self.rng.gen_range(0..eligible.len())];

        let parent_day = (parent.created_at - self.horizon.start()).num_days();
        let day_lo = cmp::max(parent_day, *policy.window.start());
        let day_hi = *policy.window.end();
        if day_lo > day_hi {
            // Unreachable: the eligibility cutoff keeps parent_day below the
            // window end for every status.
            return Err(ConstraintViolation::new(
                "orders",
                format!("empty created_at window for {status} order"),
            )
            .into());
        }

        let day = self.rng.gen_range(day_lo..=day_hi);
        let mut created_at = self
            .horizon
            .clamp_end(random_time_of_day(&mut self.rng, self.horizon.day(day)));
        if created_at <= parent.created_at {
            // Boundary draw on the parent's own day; push forward. The
            // parent is at least a day old, so this stays inside the horizon.
            created_at = parent.created_at + Duration::hours(self.rng.gen_range(1..=24));
        }

        let updated_at = match &policy.update_lag_days {
            None => created_at,
            Some(lag) => {
                let lag_days = self.rng.gen_range(lag.clone());
                self.horizon.clamp_end(random_time_of_day(
                    &mut self.rng,
                    created_at + Duration::days(lag_days),
                ))
            }
        };

        Ok(Order {
            id: None,
            user_id: parent.id,
            status,
            created_at,
            updated_at,
        })
    }

    /// Generate line items for already-persisted orders.
    ///
    /// Only products created strictly before an order qualify for it; an
    /// order with no qualifying product contributes zero items.
    pub fn generate_order_items(
        &mut self,
        orders: &[ParentRef],
        products: &[ParentRef],
    ) -> Vec<OrderItem> {
        let mut items = Vec::new();
        for order in orders {
            let eligible: Vec<&ParentRef> = products
                .iter()
                .filter(|p| p.created_at < order.created_at)
                .collect();
            if eligible.is_empty() {
                continue;
            }

            let line_count = self
                .rng
                .gen_range(1..=cmp::min(MAX_ITEMS_PER_ORDER, eligible.len()));
            for product in eligible.choose_multiple(&mut self.rng, line_count) {
                items.push(OrderItem {
                    id: None,
                    order_id: order.id,
                    product_id: product.id,
                    quantity: self.rng.gen_range(QUANTITY_RANGE),
                });
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeedGenerator;
    use chrono::{TimeZone, Utc};
    use seed_core::Horizon;
    use std::collections::HashMap;
    use std::collections::HashSet;

    fn fixed_horizon() -> Horizon {
        Horizon::ending_at(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap())
    }

    /// Parents spread across the horizon, all old enough for any status.
    fn seasoned_users(horizon: &Horizon) -> Vec<ParentRef> {
        (0..40)
            .map(|i| ParentRef::new(i + 1, horizon.day(i as i64)))
            .collect()
    }

    #[test]
    fn test_orders_strictly_follow_their_user() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);
        let users = seasoned_users(&horizon);

        let orders = generator.generate_orders(&users, 500).unwrap();
        assert_eq!(orders.len(), 500);

        let created_by_id: HashMap<i32, _> =
            users.iter().map(|u| (u.id, u.created_at)).collect();
        for order in &orders {
            let user_created = created_by_id[&order.user_id];
            order.validate(user_created, &horizon).unwrap();
        }
    }

    #[test]
    fn test_status_policies_hold() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);
        let users = seasoned_users(&horizon);

        let orders = generator.generate_orders(&users, 500).unwrap();
        for order in &orders {
            match order.status {
                OrderStatus::Pending => assert_eq!(order.updated_at, order.created_at),
                OrderStatus::Shipped | OrderStatus::Completed | OrderStatus::Cancelled => {
                    assert!(order.updated_at >= order.created_at);
                    assert!(horizon.contains(order.updated_at));
                }
            }
        }
        // Uniform four-way draw over 500 orders hits every status.
        let statuses: HashSet<_> = orders.iter().map(|o| o.status).collect();
        assert_eq!(statuses.len(), 4);
    }

    #[test]
    fn test_eligibility_exhausted_when_all_users_too_young() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);

        // Younger than the one-day minimum age of even a pending order.
        let newborns: Vec<ParentRef> = (0..10)
            .map(|i| {
                ParentRef::new(
                    i + 1,
                    horizon.end() - chrono::Duration::hours(i as i64 + 1),
                )
            })
            .collect();

        assert!(matches!(
            generator.generate_orders(&newborns, 10),
            Err(GeneratorError::EligibilityExhausted { .. })
        ));
    }

    #[test]
    fn test_items_reference_products_older_than_order() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);

        let orders: Vec<ParentRef> = (0..100)
            .map(|i| ParentRef::new(i + 1, horizon.day(30 + (i as i64 % 50))))
            .collect();
        let products: Vec<ParentRef> = (0..50)
            .map(|i| ParentRef::new(i + 1, horizon.day(i as i64)))
            .collect();

        let items = generator.generate_order_items(&orders, &products);
        assert!(!items.is_empty());

        let order_created: HashMap<i32, _> = orders.iter().map(|o| (o.id, o.created_at)).collect();
        let product_created: HashMap<i32, _> =
            products.iter().map(|p| (p.id, p.created_at)).collect();
        for item in &items {
            item.validate(order_created[&item.order_id], product_created[&item.product_id])
                .unwrap();
        }
    }

    #[test]
    fn test_per_order_item_counts_and_distinct_products() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);

        let orders: Vec<ParentRef> = (0..100)
            .map(|i| ParentRef::new(i + 1, horizon.day(60)))
            .collect();
        let products: Vec<ParentRef> = (0..50)
            .map(|i| ParentRef::new(i + 1, horizon.day(i as i64 % 59)))
            .collect();

        let items = generator.generate_order_items(&orders, &products);

        let mut per_order: HashMap<i32, Vec<i32>> = HashMap::new();
        for item in &items {
            per_order.entry(item.order_id).or_default().push(item.product_id);
        }
        for product_ids in per_order.values() {
            assert!((1..=MAX_ITEMS_PER_ORDER).contains(&product_ids.len()));
            let distinct: HashSet<_> = product_ids.iter().collect();
            assert_eq!(distinct.len(), product_ids.len());
        }
    }

    #[test]
    fn test_order_without_eligible_products_is_skipped() {
        let horizon = fixed_horizon();
        let mut generator = SeedGenerator::with_horizon(42, horizon);

        // Every product is newer than the order.
        let orders = vec![ParentRef::new(1, horizon.day(10))];
        let products: Vec<ParentRef> =
            (0..10).map(|i| ParentRef::new(i + 1, horizon.day(50))).collect();

        let items = generator.generate_order_items(&orders, &products);
        assert!(items.is_empty());
    }

    #[test]
    fn test_deterministic_linking() {
        let horizon = fixed_horizon();
        let users = seasoned_users(&horizon);

        let mut gen1 = SeedGenerator::with_horizon(42, horizon);
        let mut gen2 = SeedGenerator::with_horizon(42, horizon);
        assert_eq!(
            gen1.generate_orders(&users, 100).unwrap(),
            gen2.generate_orders(&users, 100).unwrap()
        );
    }
}
