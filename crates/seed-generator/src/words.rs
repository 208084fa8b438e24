//! Fixed attribute pools for generated entities.
//!
//! The pools are small on purpose: fixtures need plausible variety, not
//! realism. Email uniqueness comes from embedding the running row index,
//! never from the pools themselves.

use rand::Rng;
use seed_core::model::CATEGORIES;

const FIRST_NAMES: [&str; 24] = [
    "Ada", "Alan", "Barbara", "Claude", "Dennis", "Donald", "Edsger", "Frances", "Grace",
    "Hedy", "Ivan", "John", "Katherine", "Ken", "Leslie", "Linus", "Margaret", "Niklaus",
    "Radia", "Robin", "Sophie", "Tim", "Vint", "Whitfield",
];

const LAST_NAMES: [&str; 24] = [
    "Adams", "Baker", "Carter", "Diaz", "Evans", "Foster", "Garcia", "Hayes", "Ibarra",
    "Jensen", "Kim", "Lopez", "Meyer", "Nguyen", "Olsen", "Park", "Quinn", "Rivera",
    "Santos", "Turner", "Ueda", "Vargas", "Walsh", "Young",
];

const STREETS: [&str; 12] = [
    "Maple St", "Oak Ave", "Cedar Ln", "Elm Dr", "Pine Rd", "Birch Blvd", "Walnut Way",
    "Chestnut Ct", "Spruce Ter", "Willow Pl", "Juniper Loop", "Aspen Cir",
];

const CITIES: [&str; 12] = [
    "Springfield", "Riverton", "Fairview", "Georgetown", "Clinton", "Salem", "Madison",
    "Ashland", "Milton", "Dayton", "Lakewood", "Bristol",
];

const STATES: [&str; 12] = [
    "CA", "CO", "FL", "GA", "IL", "MA", "NC", "NY", "OH", "OR", "TX", "WA",
];

const EMAIL_DOMAINS: [&str; 4] = ["example.com", "example.org", "example.net", "mail.example.com"];

const PRODUCT_ADJECTIVES: [&str; 12] = [
    "Ergonomic", "Rustic", "Sleek", "Durable", "Compact", "Premium", "Handcrafted",
    "Lightweight", "Modular", "Refined", "Practical", "Incredible",
];

const PRODUCT_MATERIALS: [&str; 8] = [
    "Steel", "Wooden", "Cotton", "Granite", "Leather", "Ceramic", "Bamboo", "Aluminum",
];

const PRODUCT_NOUNS: [&str; 12] = [
    "Lamp", "Chair", "Keyboard", "Backpack", "Bottle", "Notebook", "Speaker", "Blanket",
    "Mug", "Desk", "Watch", "Kettle",
];

fn pick<'a, R: Rng>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool[rng.gen_range(0..pool.len())]
}

pub(crate) fn full_name<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, &FIRST_NAMES), pick(rng, &LAST_NAMES))
}

/// Unique within a run: the running row index is part of the local part.
pub(crate) fn email<R: Rng>(rng: &mut R, name: &str, index: u64) -> String {
    let local = name.to_ascii_lowercase().replace(' ', ".");
    format!("{local}{index}@{}", pick(rng, &EMAIL_DOMAINS))
}

pub(crate) fn address<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {}, {}, {} {}",
        rng.gen_range(1..=9999),
        pick(rng, &STREETS),
        pick(rng, &CITIES),
        pick(rng, &STATES),
        rng.gen_range(10_000..=99_999),
    )
}

pub(crate) fn product_name<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        pick(rng, &PRODUCT_ADJECTIVES),
        pick(rng, &PRODUCT_MATERIALS),
        pick(rng, &PRODUCT_NOUNS),
    )
}

pub(crate) fn category<R: Rng>(rng: &mut R) -> String {
    pick(rng, &CATEGORIES).to_string()
}
