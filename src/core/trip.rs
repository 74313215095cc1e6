//! Trip repository - Create, read, update, and delete trips.
//!
//! New trips always start in `planning`. At most one trip may be `active`:
//! an update that would activate a second trip is rejected. Deleting a trip
//! also deletes its itineraries and budgets.

use crate::{
    entities::{Budget, Itinerary, Trip, TripStatus, budget, itinerary, trip},
    errors::{Error, Result},
    store::{Operation, Store},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Fields supplied when creating a trip. Id, creation time, and status are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrip {
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
    pub interests: Vec<String>,
    /// Preferred accommodation
    pub accommodation_type: Option<String>,
    /// Preferred transport
    pub transport_mode: Option<String>,
}

/// A shallow patch: every `Some` field replaces the stored value, `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPatch {
    /// New name
    pub name: Option<String>,
    /// New destination
    pub destination: Option<String>,
    /// New first day
    pub start_date: Option<NaiveDate>,
    /// New last day
    pub end_date: Option<NaiveDate>,
    /// New total budget
    pub budget: Option<f64>,
    /// New party size
    pub travelers: Option<i32>,
    /// Replacement interest list
    pub interests: Option<Vec<String>>,
    /// New status
    pub status: Option<TripStatus>,
    /// New accommodation preference; `Some(None)` clears it
    pub accommodation_type: Option<Option<String>>,
    /// New transport preference; `Some(None)` clears it
    pub transport_mode: Option<Option<String>>,
}

impl TripPatch {
    /// A patch that only changes the status.
    pub fn status(status: TripStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(self, model: &mut trip::ActiveModel) {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(destination) = self.destination {
            model.destination = Set(destination);
        }
        if let Some(start_date) = self.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = self.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(budget) = self.budget {
            model.budget = Set(budget);
        }
        if let Some(travelers) = self.travelers {
            model.travelers = Set(travelers);
        }
        if let Some(interests) = self.interests {
            model.interests = Set(interests.into());
        }
        if let Some(status) = self.status {
            model.status = Set(status);
        }
        if let Some(accommodation_type) = self.accommodation_type {
            model.accommodation_type = Set(accommodation_type);
        }
        if let Some(transport_mode) = self.transport_mode {
            model.transport_mode = Set(transport_mode);
        }
    }
}

/// Retrieves every trip in creation order.
#[instrument(skip(store))]
pub async fn get_all_trips(store: &Store) -> Result<Vec<trip::Model>> {
    store.simulate_latency(Operation::List).await;
    Trip::find()
        .order_by_asc(trip::Column::Id)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a trip by id, returning None if it does not exist.
#[instrument(skip(store))]
pub async fn get_trip_by_id(store: &Store, trip_id: i64) -> Result<Option<trip::Model>> {
    store.simulate_latency(Operation::Get).await;
    Trip::find_by_id(trip_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds the trip currently under way, if any.
#[instrument(skip(store))]
pub async fn get_current_trip(store: &Store) -> Result<Option<trip::Model>> {
    store.simulate_latency(Operation::CurrentTrip).await;
    Trip::find()
        .filter(trip::Column::Status.eq(TripStatus::Active))
        .order_by_asc(trip::Column::Id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Creates a trip in `planning` status, stamping its creation time.
#[instrument(skip(store, new_trip), fields(name = %new_trip.name))]
pub async fn create_trip(store: &Store, new_trip: NewTrip) -> Result<trip::Model> {
    store.simulate_latency(Operation::Create).await;

    let model = trip::ActiveModel {
        name: Set(new_trip.name),
        destination: Set(new_trip.destination),
        start_date: Set(new_trip.start_date),
        end_date: Set(new_trip.end_date),
        budget: Set(new_trip.budget),
        travelers: Set(new_trip.travelers),
        interests: Set(new_trip.interests.into()),
        status: Set(TripStatus::Planning),
        accommodation_type: Set(new_trip.accommodation_type),
        transport_mode: Set(new_trip.transport_mode),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(store.db()).await?;
    info!(trip_id = created.id, "Created trip");
    Ok(created)
}

/// Creates a `planning` copy of a trip named "<name> (Copy)".
///
/// Dates, budget, travelers, interests, and preferences are carried over; the
/// copy gets its own id and creation time. Itineraries and budgets are not copied.
///
/// # Errors
/// [`Error::NotFound`] when no trip has `trip_id`.
#[instrument(skip(store))]
pub async fn duplicate_trip(store: &Store, trip_id: i64) -> Result<trip::Model> {
    let source = get_trip_by_id(store, trip_id)
        .await?
        .ok_or_else(|| Error::not_found("Trip", trip_id))?;

    let copy = NewTrip {
        name: format!("{} (Copy)", source.name),
        destination: source.destination,
        start_date: source.start_date,
        end_date: source.end_date,
        budget: source.budget,
        travelers: source.travelers,
        interests: source.interests.0,
        accommodation_type: source.accommodation_type,
        transport_mode: source.transport_mode,
    };
    create_trip(store, copy).await
}

/// Merges `patch` into the stored trip and returns the result.
///
/// # Errors
/// * [`Error::NotFound`] when no trip has `trip_id`
/// * [`Error::ActiveTripConflict`] when the patch would make a second trip active
#[instrument(skip(store, patch))]
pub async fn update_trip(store: &Store, trip_id: i64, patch: TripPatch) -> Result<trip::Model> {
    store.simulate_latency(Operation::Update).await;

    let txn = store.db().begin().await?;

    let existing = Trip::find_by_id(trip_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Trip", trip_id))?;

    if patch.is_empty() {
        return Ok(existing);
    }

    if patch.status == Some(TripStatus::Active) && !existing.is_active() {
        let other_active = Trip::find()
            .filter(trip::Column::Status.eq(TripStatus::Active))
            .filter(trip::Column::Id.ne(trip_id))
            .one(&txn)
            .await?;
        if let Some(active) = other_active {
            return Err(Error::ActiveTripConflict {
                active_id: active.id,
                requested_id: trip_id,
            });
        }
    }

    let mut model: trip::ActiveModel = existing.into();
    patch.apply(&mut model);
    let updated = model.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Deletes a trip together with its itineraries and budgets.
///
/// # Errors
/// [`Error::NotFound`] when no trip has `trip_id`.
#[instrument(skip(store))]
pub async fn delete_trip(store: &Store, trip_id: i64) -> Result<()> {
    store.simulate_latency(Operation::Delete).await;

    let txn = store.db().begin().await?;

    Trip::find_by_id(trip_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Trip", trip_id))?;

    let itineraries = Itinerary::delete_many()
        .filter(itinerary::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    let budgets = Budget::delete_many()
        .filter(budget::Column::TripId.eq(trip_id))
        .exec(&txn)
        .await?;
    Trip::delete_by_id(trip_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        trip_id,
        itineraries = itineraries.rows_affected,
        budgets = budgets.rows_affected,
        "Deleted trip and its dependents"
    );
    Ok(())
}
