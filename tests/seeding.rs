//! End-to-end scenario tests over the in-memory pipeline.
//!
//! These exercise the same generate → identify → link flow the driver runs,
//! with sequential ids standing in for the sink's (the `--dry-run` path), so
//! no database is needed.

use chrono::{TimeZone, Utc};
use commerce_seed::{seed_source, RunConfig};
use seed_core::model::assign_sequential_ids;
use seed_core::{Horizon, Order, OrderItem, OrderStatus, ParentRef, Product, User};
use seed_generator::SeedGenerator;
use seed_postgresql::ConnParams;
use std::collections::{HashMap, HashSet};

fn fixed_horizon() -> Horizon {
    Horizon::ending_at(Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap())
}

struct Dataset {
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    items: Vec<OrderItem>,
}

/// Run the whole pipeline in memory: 100 users, 50 products, 500 orders.
fn generate_dataset(seed: u64, horizon: Horizon) -> Dataset {
    let mut generator = SeedGenerator::with_horizon(seed, horizon);

    let mut users = generator.generate_users(100).unwrap();
    assign_sequential_ids(&mut users, 1);
    let user_refs: Vec<ParentRef> = users.iter().map(|u| u.parent_ref().unwrap()).collect();

    let mut products = generator.generate_products(50).unwrap();
    assign_sequential_ids(&mut products, 1);
    let product_refs: Vec<ParentRef> = products.iter().map(|p| p.parent_ref().unwrap()).collect();

    let mut orders = generator.generate_orders(&user_refs, 500).unwrap();
    assign_sequential_ids(&mut orders, 1);
    let order_refs: Vec<ParentRef> = orders.iter().map(|o| o.parent_ref().unwrap()).collect();

    let mut items = generator.generate_order_items(&order_refs, &product_refs);
    assign_sequential_ids(&mut items, 1);

    Dataset {
        users,
        products,
        orders,
        items,
    }
}

#[test]
fn test_scenario_lifecycle_invariants_hold_everywhere() {
    let horizon = fixed_horizon();
    let dataset = generate_dataset(42, horizon);

    for user in &dataset.users {
        user.validate(&horizon).unwrap();
    }
    for product in &dataset.products {
        product.validate(&horizon).unwrap();
    }

    let user_created: HashMap<i32, _> = dataset
        .users
        .iter()
        .map(|u| (u.id.unwrap(), u.created_at))
        .collect();
    for order in &dataset.orders {
        order
            .validate(user_created[&order.user_id], &horizon)
            .unwrap();
    }

    let order_created: HashMap<i32, _> = dataset
        .orders
        .iter()
        .map(|o| (o.id.unwrap(), o.created_at))
        .collect();
    let product_created: HashMap<i32, _> = dataset
        .products
        .iter()
        .map(|p| (p.id.unwrap(), p.created_at))
        .collect();
    for item in &dataset.items {
        item.validate(
            order_created[&item.order_id],
            product_created[&item.product_id],
        )
        .unwrap();
    }
}

#[test]
fn test_scenario_item_counts_and_referential_subset() {
    let dataset = generate_dataset(42, fixed_horizon());

    let order_ids: HashSet<i32> = dataset.orders.iter().map(|o| o.id.unwrap()).collect();
    let mut per_order: HashMap<i32, usize> = HashMap::new();
    for item in &dataset.items {
        assert!(order_ids.contains(&item.order_id));
        *per_order.entry(item.order_id).or_default() += 1;
    }

    // Every order contributes between 0 (no eligible product) and 5 items.
    for order in &dataset.orders {
        let count = per_order.get(&order.id.unwrap()).copied().unwrap_or(0);
        assert!(count <= 5);
    }
    assert!(!dataset.items.is_empty());
}

#[test]
fn test_scenario_pending_orders_have_no_update_lag() {
    let dataset = generate_dataset(42, fixed_horizon());
    for order in &dataset.orders {
        if order.status == OrderStatus::Pending {
            assert_eq!(order.updated_at, order.created_at);
        }
    }
}

#[test]
fn test_scenario_ids_and_emails_unique() {
    let dataset = generate_dataset(42, fixed_horizon());

    let user_ids: HashSet<_> = dataset.users.iter().map(|u| u.id.unwrap()).collect();
    assert_eq!(user_ids.len(), dataset.users.len());
    let order_ids: HashSet<_> = dataset.orders.iter().map(|o| o.id.unwrap()).collect();
    assert_eq!(order_ids.len(), dataset.orders.len());
    let item_ids: HashSet<_> = dataset.items.iter().map(|i| i.id.unwrap()).collect();
    assert_eq!(item_ids.len(), dataset.items.len());

    let emails: HashSet<_> = dataset.users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), dataset.users.len());
}

#[test]
fn test_fixed_seed_reproduces_identical_tables() {
    let horizon = fixed_horizon();
    let first = generate_dataset(42, horizon);
    let second = generate_dataset(42, horizon);

    assert_eq!(first.users, second.users);
    assert_eq!(first.products, second.products);
    assert_eq!(first.orders, second.orders);
    assert_eq!(first.items, second.items);
}

#[test]
fn test_different_seeds_produce_different_tables() {
    let horizon = fixed_horizon();
    let first = generate_dataset(42, horizon);
    let second = generate_dataset(7, horizon);

    assert_ne!(first.orders, second.orders);
}

#[tokio::test]
async fn test_dry_run_driver_never_touches_a_database() {
    // Unroutable parameters prove the dry-run path opens no connection.
    let params = ConnParams {
        host: "host.invalid".to_string(),
        port: 1,
        dbname: "nope".to_string(),
        user: "nobody".to_string(),
        password: String::new(),
    };
    let config = RunConfig {
        dry_run: true,
        ..RunConfig::default()
    };

    let summary = seed_source(&params, &config).await.unwrap();
    let counts: HashMap<_, _> = summary.table_counts.iter().copied().collect();
    assert_eq!(counts["users"], 100);
    assert_eq!(counts["products"], 50);
    assert_eq!(counts["orders"], 500);
    assert!(counts["order_items"] > 0);
    assert!(summary.order_range.is_some());
}
