//! Base entity generation (users, products).

use crate::words;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use seed_core::model::{OrderStatus, MAX_PRICE_CENTS, MIN_PRICE_CENTS};
use seed_core::{ConstraintViolation, Horizon, Product, User};
use std::cmp;

/// Fraction of users that end up soft-deleted.
pub const USER_SOFT_DELETE_PROBABILITY: f64 = 0.05;

/// Fraction of products that end up soft-deleted.
pub const PRODUCT_SOFT_DELETE_PROBABILITY: f64 = 0.03;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The caller asked for zero rows, which is a contract violation.
    #[error("invalid entity count: {0} (must be at least 1)")]
    InvalidCount(usize),

    /// No persisted parent satisfies the status's minimum-age policy.
    #[error("no user is old enough to carry a {status} order")]
    EligibilityExhausted { status: OrderStatus },

    /// A generated row failed an invariant; indicates a generator bug.
    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),
}

/// Deterministic fixture generator.
///
/// Owns the seeded RNG and the generation horizon; the same seed and
/// horizon produce identical output. The running row index feeds email
/// uniqueness across every `generate_users` call of one run.
pub struct SeedGenerator {
    pub(crate) rng: StdRng,
    pub(crate) horizon: Horizon,
    index: u64,
}

impl SeedGenerator {
    /// A generator over a horizon ending at the current time.
    pub fn new(seed: u64) -> Self {
        Self::with_horizon(seed, Horizon::ending_now())
    }

    /// A generator over an explicit horizon, for reproducible fixtures.
    pub fn with_horizon(seed: u64, horizon: Horizon) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            horizon,
            index: 0,
        }
    }

    /// The horizon all generated timestamps fall in.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Generate `count` users. Emails are unique across the whole run.
    pub fn generate_users(&mut self, count: usize) -> Result<Vec<User>, GeneratorError> {
        if count == 0 {
            return Err(GeneratorError::InvalidCount(count));
        }

        let mut users = Vec::with_capacity(count);
        for _ in 0..count {
            let (created_at, updated_at, deleted_at) =
                self.lifecycle(USER_SOFT_DELETE_PROBABILITY);
            let name = words::full_name(&mut self.rng);
            let email = words::email(&mut self.rng, &name, self.index);
            let address = words::address(&mut self.rng);
            self.index += 1;

            users.push(User {
                id: None,
                name,
                email,
                address,
                created_at,
                updated_at,
                deleted_at,
            });
        }
        Ok(users)
    }

    /// Generate `count` products.
    pub fn generate_products(&mut self, count: usize) -> Result<Vec<Product>, GeneratorError> {
        if count == 0 {
            return Err(GeneratorError::InvalidCount(count));
        }

        let mut products = Vec::with_capacity(count);
        for _ in 0..count {
            let (created_at, updated_at, deleted_at) =
                self.lifecycle(PRODUCT_SOFT_DELETE_PROBABILITY);

            products.push(Product {
                id: None,
                name: words::product_name(&mut self.rng),
                category: words::category(&mut self.rng),
                price: Decimal::new(
                    self.rng.gen_range(MIN_PRICE_CENTS..=MAX_PRICE_CENTS),
                    2,
                ),
                created_at,
                updated_at,
                deleted_at,
            });
        }
        Ok(products)
    }

    /// Draw the (created_at, updated_at, deleted_at) triple.
    ///
    /// Created on the last eligible day means there is no update window
    /// left: updated_at equals created_at and the soft-delete roll is
    /// skipped entirely.
    fn lifecycle(
        &mut self,
        delete_probability: f64,
    ) -> (DateTime<Utc>, DateTime<Utc>, Option<DateTime<Utc>>) {
        let days = self.horizon.days();
        let created_day = self.rng.gen_range(0..=days);
        let created_at = self
            .horizon
            .clamp_end(random_time_of_day(&mut self.rng, self.horizon.day(created_day)));

        if created_day == days {
            return (created_at, created_at, None);
        }

        let offset = cmp::min(self.rng.gen_range(0..days), days - created_day);
        let mut updated_at = self
            .horizon
            .clamp_end(random_time_of_day(&mut self.rng, created_at + Duration::days(offset)));
        if updated_at < created_at {
            // zero-day offset with an earlier re-drawn time of day
            updated_at = created_at;
        }

        let deleted_at = self
            .rng
            .gen_bool(delete_probability)
            .then_some(updated_at);

        (created_at, updated_at, deleted_at)
    }
}

/// Keep the date, re-draw hour/minute/second.
pub(crate) fn random_time_of_day<R: Rng>(rng: &mut R, at: DateTime<Utc>) -> DateTime<Utc> {
    let (hour, minute, second) = (
        rng.gen_range(0..24),
        rng.gen_range(0..60),
        rng.gen_range(0..60),
    );
    at.date_naive()
        .and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
        .unwrap_or(at)
}
