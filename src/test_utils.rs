//! Shared test utilities.
//!
//! Stores built here use an in-memory database, no simulated latency, and a
//! fixed generator seed so tests are fast and reproducible.

use crate::{
    config::{
        Settings,
        fixtures::{Fixtures, embedded_fixtures},
    },
    core::{activity, budget, trip},
    entities::{self, ActivityType, Location},
    errors::Result,
    store::Store,
};
use chrono::NaiveDate;

/// Seed used by every test store.
pub const TEST_SEED: u64 = 7;

fn test_settings() -> Settings {
    Settings {
        latency_scale: 0.0,
        generator_seed: Some(TEST_SEED),
        ..Settings::default()
    }
}

/// A store with all tables created and nothing seeded.
pub async fn setup_empty_store() -> Result<Store> {
    Store::open_with_fixtures(&test_settings(), &Fixtures::default()).await
}

/// A store seeded with the embedded fixtures.
pub async fn setup_seeded_store() -> Result<Store> {
    Store::open_with_fixtures(&test_settings(), &embedded_fixtures()?).await
}

/// Parses `YYYY-MM-DD`; panics on bad input, test-only.
#[allow(clippy::expect_used)]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// A trip payload with sensible defaults.
///
/// # Defaults
/// * `destination`: "Lisbon, Portugal"
/// * dates: 2024-06-01 to 2024-06-03
/// * `budget`: 1500.0, `travelers`: 2, `interests`: culture, food
pub fn new_trip(name: &str) -> trip::NewTrip {
    trip::NewTrip {
        name: name.to_string(),
        destination: "Lisbon, Portugal".to_string(),
        start_date: date("2024-06-01"),
        end_date: date("2024-06-03"),
        budget: 1500.0,
        travelers: 2,
        interests: vec!["culture".to_string(), "food".to_string()],
        accommodation_type: Some("hotel".to_string()),
        transport_mode: Some("flight".to_string()),
    }
}

/// Creates a test trip with sensible defaults.
pub async fn create_test_trip(store: &Store, name: &str) -> Result<entities::trip::Model> {
    trip::create_trip(store, new_trip(name)).await
}

/// Creates a test trip spanning `start`..=`end`.
pub async fn create_trip_between(
    store: &Store,
    name: &str,
    start: &str,
    end: &str,
) -> Result<entities::trip::Model> {
    let payload = trip::NewTrip {
        start_date: date(start),
        end_date: date(end),
        ..new_trip(name)
    };
    trip::create_trip(store, payload).await
}

/// A catalog activity payload.
pub fn new_activity(name: &str, activity_type: ActivityType, cost: f64) -> activity::NewActivity {
    activity::NewActivity {
        name: name.to_string(),
        activity_type,
        location: Location {
            name: "Baixa".to_string(),
            lat: 38.7110,
            lng: -9.1366,
        },
        duration: 60,
        cost,
        time: "10:00".to_string(),
        description: format!("{name} description"),
        tags: Vec::new(),
    }
}

/// A budget payload for `trip_id` with the given category ceilings.
pub fn new_budget(trip_id: i64, ceilings: [f64; 5]) -> budget::NewBudget {
    let [accommodation, transport, activities, food, other] = ceilings;
    budget::NewBudget {
        trip_id,
        accommodation,
        transport,
        activities,
        food,
        other,
    }
}
