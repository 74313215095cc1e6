//! The application store.
//!
//! One [`Store`] is built at start-up and handed by reference to every
//! repository operation. It owns the database connection, the simulated latency
//! profile, and the random source used by the itinerary generator.

use crate::config::database::{create_connection, create_tables};
use crate::config::fixtures::{Fixtures, load_for_settings, seed_fixtures};
use crate::config::settings::Settings;
use crate::errors::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::DatabaseConnection;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Kinds of store operation, each with its own simulated delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Fetch a whole collection
    List,
    /// Fetch one record by id
    Get,
    /// Filter by type or owning trip
    Lookup,
    /// Find the active trip
    CurrentTrip,
    /// Insert a record
    Create,
    /// Insert an itinerary
    CreateItinerary,
    /// Merge a patch into a record
    Update,
    /// Remove a record
    Delete,
    /// Text search over the catalog
    Search,
    /// Sum a budget
    TotalBudget,
    /// Generate an itinerary
    Generate,
}

impl Operation {
    /// Unscaled delay in milliseconds.
    pub const fn base_delay_ms(self) -> u64 {
        match self {
            Self::List | Self::Update => 300,
            Self::Get | Self::CurrentTrip | Self::TotalBudget => 200,
            Self::Lookup | Self::Delete => 250,
            Self::Create | Self::Search => 400,
            Self::CreateItinerary => 500,
            Self::Generate => 2000,
        }
    }
}

/// Scales the per-operation delays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyProfile {
    scale: f64,
}

impl LatencyProfile {
    /// A profile multiplying every base delay by `scale` (negative values clamp to 0).
    pub fn new(scale: f64) -> Self {
        Self {
            scale: scale.max(0.0),
        }
    }

    /// A profile with no delays at all.
    pub const fn disabled() -> Self {
        Self { scale: 0.0 }
    }

    /// The delay applied before `op`.
    pub fn delay_for(&self, op: Operation) -> Duration {
        Duration::from_millis(op.base_delay_ms()).mul_f64(self.scale)
    }
}

/// Database connection plus the runtime knobs every repository needs.
#[derive(Debug)]
pub struct Store {
    db: DatabaseConnection,
    latency: LatencyProfile,
    rng: Mutex<StdRng>,
}

impl Store {
    /// Wraps an existing connection. The tables must already exist.
    pub fn new(db: DatabaseConnection, latency: LatencyProfile, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self {
            db,
            latency,
            rng: Mutex::new(rng),
        }
    }

    /// Connects, creates the tables, and seeds the fixtures named by `settings`.
    #[instrument(skip(settings), fields(url = %settings.database_url))]
    pub async fn open(settings: &Settings) -> Result<Self> {
        let fixtures = load_for_settings(settings)?;
        Self::open_with_fixtures(settings, &fixtures).await
    }

    /// Like [`Store::open`] but with caller-supplied fixtures.
    pub async fn open_with_fixtures(settings: &Settings, fixtures: &Fixtures) -> Result<Self> {
        let db = create_connection(&settings.database_url).await?;
        create_tables(&db).await?;
        seed_fixtures(&db, fixtures).await?;
        info!("Store ready");

        Ok(Self::new(
            db,
            LatencyProfile::new(settings.latency_scale),
            settings.generator_seed,
        ))
    }

    /// The underlying connection.
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// The active latency profile.
    pub const fn latency(&self) -> LatencyProfile {
        self.latency
    }

    /// Waits out the simulated delay for `op`.
    pub async fn simulate_latency(&self, op: Operation) {
        let delay = self.latency.delay_for(op);
        if delay.is_zero() {
            return;
        }
        debug!(?op, ?delay, "Simulating latency");
        tokio::time::sleep(delay).await;
    }

    /// Runs `f` with exclusive access to the generator's random source.
    ///
    /// The lock is released before this returns, so it is never held across an await.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::StoreUnavailable("random source lock poisoned".to_string()))?;
        Ok(f(&mut rng))
    }
}
