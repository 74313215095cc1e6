//! Trip overview - The read side of a single trip.
//!
//! Loads a trip with its itinerary and budget, and shapes that data for
//! display: per-category budget usage, a day's map centre, and its timeline.

use crate::{
    core::{
        budget::{BudgetCategory, get_budget_by_trip_id},
        generator::BASE_COORDINATES,
        itinerary::get_itinerary_by_trip_id,
        trip::{get_current_trip, get_trip_by_id},
    },
    entities::{Day, PlannedActivity, budget, itinerary, trip},
    errors::{Error, Result},
    store::Store,
};
use serde::Serialize;
use tracing::{debug, instrument};

/// A trip together with its itinerary and budget, when they exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripOverview {
    /// The trip itself
    pub trip: trip::Model,
    /// First itinerary stored for the trip
    pub itinerary: Option<itinerary::Model>,
    /// First budget stored for the trip
    pub budget: Option<budget::Model>,
}

/// Loads the overview for `trip_id`. Itinerary and budget are fetched concurrently.
///
/// # Errors
/// [`Error::NotFound`] when no trip has `trip_id`; otherwise the first store error.
#[instrument(skip(store))]
pub async fn load_trip_overview(store: &Store, trip_id: i64) -> Result<TripOverview> {
    let trip = get_trip_by_id(store, trip_id)
        .await?
        .ok_or_else(|| Error::not_found("Trip", trip_id))?;
    assemble(store, trip).await
}

/// Loads the overview for the active trip, if there is one.
#[instrument(skip(store))]
pub async fn load_current_trip_overview(store: &Store) -> Result<Option<TripOverview>> {
    match get_current_trip(store).await? {
        Some(trip) => assemble(store, trip).await.map(Some),
        None => Ok(None),
    }
}

async fn assemble(store: &Store, trip: trip::Model) -> Result<TripOverview> {
    let (itinerary, budget) = tokio::try_join!(
        get_itinerary_by_trip_id(store, trip.id),
        get_budget_by_trip_id(store, trip.id)
    )?;
    debug!(
        trip_id = trip.id,
        has_itinerary = itinerary.is_some(),
        has_budget = budget.is_some(),
        "Assembled trip overview"
    );
    Ok(TripOverview {
        trip,
        itinerary,
        budget,
    })
}

/// Display usage for one budget category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryUsage {
    /// The category
    pub category: BudgetCategory,
    /// Ceiling stored on the budget
    pub allocated: f64,
    /// Estimated spend
    pub spent: f64,
    /// `spent` as a percentage of `allocated`; zero for an empty ceiling
    pub percent: f64,
}

/// Share of each ceiling shown as already spent.
pub const fn spent_fraction(category: BudgetCategory) -> f64 {
    match category {
        BudgetCategory::Accommodation => 0.7,
        BudgetCategory::Transport => 0.5,
        BudgetCategory::Activities => 0.8,
        BudgetCategory::Food => 0.6,
        BudgetCategory::Other => 0.3,
    }
}

/// Usage for every category of `budget`, in display order.
pub fn budget_breakdown(budget: &budget::Model) -> Vec<CategoryUsage> {
    BudgetCategory::ALL
        .iter()
        .map(|&category| {
            let allocated = category.ceiling(budget);
            let spent = allocated * spent_fraction(category);
            let percent = if allocated > 0.0 {
                spent / allocated * 100.0
            } else {
                0.0
            };
            CategoryUsage {
                category,
                allocated,
                spent,
                percent,
            }
        })
        .collect()
}

/// Mean `(lat, lng)` of the day's activities, or the base coordinate for an empty day.
pub fn map_center(day: &Day) -> (f64, f64) {
    if day.activities.is_empty() {
        return BASE_COORDINATES;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = day.activities.len() as f64;
    let (lat, lng) = day
        .activities
        .iter()
        .fold((0.0, 0.0), |(lat, lng), activity| {
            (lat + activity.location.lat, lng + activity.location.lng)
        });
    (lat / count, lng / count)
}

/// The day's activities ordered by start time. Ties keep their stored order.
pub fn timeline(day: &Day) -> Vec<&PlannedActivity> {
    let mut ordered: Vec<&PlannedActivity> = day.activities.iter().collect();
    ordered.sort_by(|a, b| a.time.cmp(&b.time));
    ordered
}
