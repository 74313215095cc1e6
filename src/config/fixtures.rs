//! Fixture collections loaded from TOML.
//!
//! The baseline trips, catalog activities, itineraries, and budgets ship inside
//! the binary (`data/fixtures.toml`). A different file can be supplied through
//! [`Settings::fixtures_path`](super::Settings). Fixtures are inserted with
//! their own ids, so cross references (`trip_id`) can be written by hand.

use super::settings::Settings;
use crate::entities::{
    Activity, ActivityType, Budget, Day, Days, Itinerary, Location, StringList, Trip, TripStatus,
    activity, budget, itinerary, trip,
};
use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

const EMBEDDED_FIXTURES: &str = include_str!("../../data/fixtures.toml");

/// Configuration structure representing an entire fixture file
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    /// Trips to seed
    #[serde(default)]
    pub trips: Vec<TripFixture>,
    /// Catalog activities to seed
    #[serde(default)]
    pub activities: Vec<ActivityFixture>,
    /// Itineraries to seed
    #[serde(default)]
    pub itineraries: Vec<ItineraryFixture>,
    /// Budgets to seed
    #[serde(default)]
    pub budgets: Vec<BudgetFixture>,
}

/// A seeded trip
#[derive(Debug, Clone, Deserialize)]
pub struct TripFixture {
    /// Fixed id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Destination
    pub destination: String,
    /// First day
    pub start_date: NaiveDate,
    /// Last day
    pub end_date: NaiveDate,
    /// Total budget
    pub budget: f64,
    /// Party size
    pub travelers: i32,
    /// Interest ids
    #[serde(default)]
    pub interests: Vec<String>,
    /// Status; fixtures may seed any status
    pub status: TripStatus,
    /// Preferred accommodation
    #[serde(default)]
    pub accommodation_type: Option<String>,
    /// Preferred transport
    #[serde(default)]
    pub transport_mode: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A seeded catalog activity
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityFixture {
    /// Fixed id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Kind of activity
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Where it happens
    pub location: Location,
    /// Minutes
    pub duration: i32,
    /// Currency units
    pub cost: f64,
    /// `HH:MM`
    pub time: String,
    /// Description
    pub description: String,
    /// Labels
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A seeded itinerary
#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryFixture {
    /// Fixed id
    pub id: i64,
    /// Owning trip
    pub trip_id: i64,
    /// Days with embedded activities
    #[serde(default)]
    pub days: Vec<Day>,
    /// Stored total; derived from the day activities when omitted
    #[serde(default)]
    pub total_cost: Option<f64>,
    /// Last update timestamp
    pub last_updated: DateTime<Utc>,
}

/// A seeded budget
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetFixture {
    /// Fixed id
    pub id: i64,
    /// Owning trip
    pub trip_id: i64,
    /// Lodging ceiling
    pub accommodation: f64,
    /// Transport ceiling
    pub transport: f64,
    /// Activities ceiling
    pub activities: f64,
    /// Food ceiling
    pub food: f64,
    /// Everything else
    pub other: f64,
}

impl Fixtures {
    /// Number of trips seeded with the `active` status.
    pub fn active_trip_count(&self) -> usize {
        self.trips
            .iter()
            .filter(|trip| trip.status == TripStatus::Active)
            .count()
    }

    fn check(&self) -> Result<()> {
        if self.active_trip_count() > 1 {
            return Err(Error::Config {
                message: format!(
                    "Fixtures contain {} active trips; at most one is allowed",
                    self.active_trip_count()
                ),
            });
        }
        Ok(())
    }
}

/// Parses fixtures from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid, required fields are missing, or
/// more than one trip is seeded as active.
pub fn parse_fixtures(contents: &str) -> Result<Fixtures> {
    let fixtures: Fixtures = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse fixtures: {e}"),
    })?;
    fixtures.check()?;
    Ok(fixtures)
}

/// Loads fixtures from a TOML file.
pub fn load_fixtures<P: AsRef<Path>>(path: P) -> Result<Fixtures> {
    let path_ref = path.as_ref();
    debug!("Loading fixtures from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read fixture file {path_ref:?}: {e}"),
    })?;
    parse_fixtures(&contents)
}

/// The fixtures compiled into the binary.
pub fn embedded_fixtures() -> Result<Fixtures> {
    parse_fixtures(EMBEDDED_FIXTURES)
}

/// Loads the fixture file named in `settings`, or the embedded fixtures.
pub fn load_for_settings(settings: &Settings) -> Result<Fixtures> {
    settings
        .fixtures_path
        .as_ref()
        .map_or_else(embedded_fixtures, load_fixtures)
}

/// Replaces the contents of all four tables with the fixture rows, in one database transaction.
pub async fn seed_fixtures(db: &DatabaseConnection, fixtures: &Fixtures) -> Result<()> {
    info!(
        "Seeding {} trips, {} activities, {} itineraries, {} budgets",
        fixtures.trips.len(),
        fixtures.activities.len(),
        fixtures.itineraries.len(),
        fixtures.budgets.len()
    );

    let txn = db.begin().await?;

    Trip::delete_many().exec(&txn).await?;
    Activity::delete_many().exec(&txn).await?;
    Itinerary::delete_many().exec(&txn).await?;
    Budget::delete_many().exec(&txn).await?;

    for fixture in &fixtures.trips {
        trip::ActiveModel {
            id: Set(fixture.id),
            name: Set(fixture.name.clone()),
            destination: Set(fixture.destination.clone()),
            start_date: Set(fixture.start_date),
            end_date: Set(fixture.end_date),
            budget: Set(fixture.budget),
            travelers: Set(fixture.travelers),
            interests: Set(StringList(fixture.interests.clone())),
            status: Set(fixture.status),
            accommodation_type: Set(fixture.accommodation_type.clone()),
            transport_mode: Set(fixture.transport_mode.clone()),
            created_at: Set(fixture.created_at),
        }
        .insert(&txn)
        .await?;
    }

    for fixture in &fixtures.activities {
        activity::ActiveModel {
            id: Set(fixture.id),
            name: Set(fixture.name.clone()),
            activity_type: Set(fixture.activity_type),
            location: Set(fixture.location.clone()),
            duration: Set(fixture.duration),
            cost: Set(fixture.cost),
            time: Set(fixture.time.clone()),
            description: Set(fixture.description.clone()),
            tags: Set(StringList(fixture.tags.clone())),
            created_at: Set(None),
        }
        .insert(&txn)
        .await?;
    }

    for fixture in &fixtures.itineraries {
        let days = Days(fixture.days.clone());
        let total_cost = fixture
            .total_cost
            .unwrap_or_else(|| days.iter().map(Day::total_cost).sum());
        itinerary::ActiveModel {
            id: Set(fixture.id),
            trip_id: Set(fixture.trip_id),
            days: Set(days),
            total_cost: Set(total_cost),
            last_updated: Set(fixture.last_updated),
        }
        .insert(&txn)
        .await?;
    }

    for fixture in &fixtures.budgets {
        budget::ActiveModel {
            id: Set(fixture.id),
            trip_id: Set(fixture.trip_id),
            accommodation: Set(fixture.accommodation),
            transport: Set(fixture.transport),
            activities: Set(fixture.activities),
            food: Set(fixture.food),
            other: Set(fixture.other),
            created_at: Set(None),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}
