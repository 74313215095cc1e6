//! Itinerary repository - Stored schedules and itinerary generation.
//!
//! Every write stamps `last_updated`. `generate_itinerary` draws from the
//! store's random source, runs the generator, and stores the result.

use crate::{
    core::generator::draft_itinerary,
    entities::{Day, Days, Itinerary, itinerary, trip},
    errors::{Error, Result},
    store::{Operation, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Fields supplied when storing an itinerary directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItinerary {
    /// Owning trip
    pub trip_id: i64,
    /// Days in date order
    pub days: Vec<Day>,
    /// Total cost as computed by the caller
    pub total_cost: f64,
}

/// A shallow patch over an itinerary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPatch {
    /// Move to another trip
    pub trip_id: Option<i64>,
    /// Replacement days
    pub days: Option<Vec<Day>>,
    /// Replacement total
    pub total_cost: Option<f64>,
}

impl ItineraryPatch {
    fn apply(self, model: &mut itinerary::ActiveModel) {
        if let Some(trip_id) = self.trip_id {
            model.trip_id = Set(trip_id);
        }
        if let Some(days) = self.days {
            model.days = Set(Days(days));
        }
        if let Some(total_cost) = self.total_cost {
            model.total_cost = Set(total_cost);
        }
    }
}

/// Retrieves every itinerary.
#[instrument(skip(store))]
pub async fn get_all_itineraries(store: &Store) -> Result<Vec<itinerary::Model>> {
    store.simulate_latency(Operation::List).await;
    Itinerary::find()
        .order_by_asc(itinerary::Column::Id)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Finds an itinerary by id.
#[instrument(skip(store))]
pub async fn get_itinerary_by_id(
    store: &Store,
    itinerary_id: i64,
) -> Result<Option<itinerary::Model>> {
    store.simulate_latency(Operation::Get).await;
    Itinerary::find_by_id(itinerary_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds the first itinerary belonging to `trip_id`.
#[instrument(skip(store))]
pub async fn get_itinerary_by_trip_id(
    store: &Store,
    trip_id: i64,
) -> Result<Option<itinerary::Model>> {
    store.simulate_latency(Operation::Lookup).await;
    Itinerary::find()
        .filter(itinerary::Column::TripId.eq(trip_id))
        .order_by_asc(itinerary::Column::Id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Stores an itinerary, stamping `last_updated`.
#[instrument(skip(store, new_itinerary), fields(trip_id = new_itinerary.trip_id))]
pub async fn create_itinerary(
    store: &Store,
    new_itinerary: NewItinerary,
) -> Result<itinerary::Model> {
    store.simulate_latency(Operation::CreateItinerary).await;

    let model = itinerary::ActiveModel {
        trip_id: Set(new_itinerary.trip_id),
        days: Set(Days(new_itinerary.days)),
        total_cost: Set(new_itinerary.total_cost),
        last_updated: Set(Utc::now()),
        ..Default::default()
    };

    model.insert(store.db()).await.map_err(Into::into)
}

/// Merges `patch` into an itinerary and re-stamps `last_updated`, even for an empty patch.
///
/// # Errors
/// [`Error::NotFound`] when no itinerary has `itinerary_id`.
#[instrument(skip(store, patch))]
pub async fn update_itinerary(
    store: &Store,
    itinerary_id: i64,
    patch: ItineraryPatch,
) -> Result<itinerary::Model> {
    store.simulate_latency(Operation::Update).await;

    let existing = Itinerary::find_by_id(itinerary_id)
        .one(store.db())
        .await?
        .ok_or_else(|| Error::not_found("Itinerary", itinerary_id))?;

    let mut model: itinerary::ActiveModel = existing.into();
    patch.apply(&mut model);
    model.last_updated = Set(Utc::now());
    model.update(store.db()).await.map_err(Into::into)
}

/// Deletes an itinerary.
///
/// # Errors
/// [`Error::NotFound`] when no itinerary has `itinerary_id`.
#[instrument(skip(store))]
pub async fn delete_itinerary(store: &Store, itinerary_id: i64) -> Result<()> {
    store.simulate_latency(Operation::Delete).await;

    let result = Itinerary::delete_by_id(itinerary_id)
        .exec(store.db())
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Itinerary", itinerary_id));
    }
    Ok(())
}

/// Generates and stores an itinerary for `trip`.
///
/// The generated activities live only inside the itinerary's days; the catalog
/// is not touched.
#[instrument(skip(store, trip), fields(trip_id = trip.id))]
pub async fn generate_itinerary(store: &Store, trip: &trip::Model) -> Result<itinerary::Model> {
    store.simulate_latency(Operation::Generate).await;

    let now = Utc::now();
    let draft = store.with_rng(|rng| draft_itinerary(trip, rng, now.timestamp_millis()))?;

    let model = itinerary::ActiveModel {
        trip_id: Set(trip.id),
        days: Set(draft.days),
        total_cost: Set(draft.total_cost),
        last_updated: Set(now),
        ..Default::default()
    };
    let stored = model.insert(store.db()).await?;

    info!(
        itinerary_id = stored.id,
        days = stored.days.len(),
        total_cost = stored.total_cost,
        "Generated itinerary"
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::generator::POOL_SIZE;
    use crate::core::{activity, trip as trip_repo};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_generate_itinerary_scenario() -> Result<()> {
        let store = setup_empty_store().await?;
        let trip = create_trip_between(&store, "June", "2024-06-01", "2024-06-03").await?;

        let itinerary = generate_itinerary(&store, &trip).await?;

        assert_eq!(itinerary.trip_id, trip.id);
        assert_eq!(itinerary.days.len(), 3);
        assert_eq!(itinerary.days.activity_count(), POOL_SIZE);
        for (index, day) in itinerary.days.iter().enumerate() {
            assert_eq!(day.activities.len(), 4);
            assert!(day.activities.iter().all(|a| a.day_index == index));
        }
        let sum: f64 = itinerary.days.iter().map(Day::total_cost).sum();
        assert_eq!(itinerary.total_cost, sum);

        // Stored and retrievable by trip
        let fetched = get_itinerary_by_trip_id(&store, trip.id).await?.unwrap();
        assert_eq!(fetched, itinerary);
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_for_week_long_trip() -> Result<()> {
        let store = setup_empty_store().await?;
        let trip = create_trip_between(&store, "Week", "2024-06-01", "2024-06-07").await?;

        let itinerary = generate_itinerary(&store, &trip).await?;

        assert_eq!(itinerary.days.len(), trip.day_count());
        assert_eq!(itinerary.days.len(), 7);
        assert_eq!(itinerary.days.activity_count(), POOL_SIZE);
        assert!(
            itinerary
                .days
                .iter()
                .flat_map(|d| d.activities.iter())
                .all(|a| a.day_index <= 2)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_generate_does_not_touch_catalog() -> Result<()> {
        let store = setup_seeded_store().await?;
        let before = activity::get_all_activities(&store).await?;

        let trip = trip_repo::get_trip_by_id(&store, 2).await?.unwrap();
        generate_itinerary(&store, &trip).await?;

        assert_eq!(activity::get_all_activities(&store).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_seeded_stores_generate_identical_schedules() -> Result<()> {
        let first = setup_empty_store().await?;
        let second = setup_empty_store().await?;
        let trip_a = create_trip_between(&first, "A", "2024-06-01", "2024-06-03").await?;
        let trip_b = create_trip_between(&second, "A", "2024-06-01", "2024-06-03").await?;

        let a = generate_itinerary(&first, &trip_a).await?;
        let b = generate_itinerary(&second, &trip_b).await?;

        let strip = |days: &Days| -> Vec<(String, f64, String)> {
            days.iter()
                .flat_map(|d| d.activities.iter())
                .map(|a| (a.name.clone(), a.cost, a.time.clone()))
                .collect()
        };
        assert_eq!(strip(&a.days), strip(&b.days));
        assert_eq!(a.total_cost, b.total_cost);
        let weather_a: Vec<_> = a.days.iter().map(|d| d.weather.clone()).collect();
        let weather_b: Vec<_> = b.days.iter().map(|d| d.weather.clone()).collect();
        assert_eq!(weather_a, weather_b);
        Ok(())
    }

    #[tokio::test]
    async fn test_itinerary_crud() -> Result<()> {
        let store = setup_seeded_store().await?;
        let seeded = get_itinerary_by_id(&store, 1).await?.unwrap();

        let created = create_itinerary(
            &store,
            NewItinerary {
                trip_id: 2,
                days: seeded.days.0.clone(),
                total_cost: seeded.total_cost,
            },
        )
        .await?;
        assert_eq!(created.trip_id, 2);
        assert_eq!(created.days, seeded.days);
        assert!(created.last_updated > seeded.last_updated);
        assert_eq!(get_all_itineraries(&store).await?.len(), 2);

        let updated = update_itinerary(
            &store,
            created.id,
            ItineraryPatch {
                total_cost: Some(12.5),
                ..ItineraryPatch::default()
            },
        )
        .await?;
        assert_eq!(updated.total_cost, 12.5);
        assert_eq!(updated.days, created.days);
        assert!(updated.last_updated >= created.last_updated);

        delete_itinerary(&store, created.id).await?;
        assert!(get_itinerary_by_id(&store, created.id).await?.is_none());
        assert!(matches!(
            delete_itinerary(&store, created.id).await,
            Err(Error::NotFound {
                entity: "Itinerary",
                ..
            })
        ));
        assert!(matches!(
            update_itinerary(&store, created.id, ItineraryPatch::default()).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }
}
