//! Dashboard - Trip statistics, upcoming plans, and the trip list filter.
//!
//! Everything here except [`load_dashboard`] works on trips already loaded
//! from the store. Dates are compared against a caller-supplied `today`.

use crate::{
    core::{itinerary::get_itinerary_by_trip_id, trip::get_all_trips},
    entities::{PlannedActivity, TripStatus, trip},
    errors::Result,
    store::Store,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{instrument, warn};

/// Upcoming trips shown on the dashboard.
pub const UPCOMING_TRIP_LIMIT: usize = 3;

/// Upcoming activities shown on the dashboard.
pub const UPCOMING_ACTIVITY_LIMIT: usize = 5;

/// Totals across every trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TripStats {
    /// Number of trips
    pub total_trips: usize,
    /// Trips with status `active`
    pub active_trips: usize,
    /// Trips with status `completed`
    pub completed_trips: usize,
    /// Sum of every trip's budget
    pub total_budget: f64,
}

impl TripStats {
    /// Computes the totals for `trips`.
    pub fn from_trips(trips: &[trip::Model]) -> Self {
        trips.iter().fold(Self::default(), |mut stats, trip| {
            stats.total_trips += 1;
            match trip.status {
                TripStatus::Active => stats.active_trips += 1,
                TripStatus::Completed => stats.completed_trips += 1,
                TripStatus::Planning => {}
            }
            stats.total_budget += trip.budget;
            stats
        })
    }
}

/// Trip counts for the status filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Every trip
    pub all: usize,
    /// Still being planned
    pub planning: usize,
    /// Under way
    pub active: usize,
    /// Finished
    pub completed: usize,
}

/// Counts `trips` per status.
pub fn status_counts(trips: &[trip::Model]) -> StatusCounts {
    let mut counts = StatusCounts {
        all: trips.len(),
        ..StatusCounts::default()
    };
    for trip in trips {
        match trip.status {
            TripStatus::Planning => counts.planning += 1,
            TripStatus::Active => counts.active += 1,
            TripStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Up to three trips starting after `today` that are not completed, in list order.
pub fn upcoming_trips(trips: &[trip::Model], today: NaiveDate) -> Vec<&trip::Model> {
    trips
        .iter()
        .filter(|trip| trip.start_date > today && trip.status != TripStatus::Completed)
        .take(UPCOMING_TRIP_LIMIT)
        .collect()
}

/// A scheduled activity tagged with its day and trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingActivity {
    /// The activity
    #[serde(flatten)]
    pub activity: PlannedActivity,
    /// Day it is scheduled on
    pub date: NaiveDate,
    /// Name of the trip it belongs to
    pub trip_name: String,
}

/// Up to five activities from the active trip's itinerary on or after `today`.
///
/// Returns an empty list when there is no active trip or it has no itinerary.
/// A failed itinerary lookup is logged and treated as no itinerary.
#[instrument(skip(store, active_trip), fields(trip_id = active_trip.id))]
pub async fn upcoming_activities(
    store: &Store,
    active_trip: &trip::Model,
    today: NaiveDate,
) -> Vec<UpcomingActivity> {
    let itinerary = match get_itinerary_by_trip_id(store, active_trip.id).await {
        Ok(itinerary) => itinerary,
        Err(e) => {
            warn!("Failed to load upcoming activities: {}", e);
            None
        }
    };

    let Some(itinerary) = itinerary else {
        return Vec::new();
    };

    itinerary
        .days
        .iter()
        .filter(|day| day.date >= today)
        .flat_map(|day| {
            day.activities.iter().map(|activity| UpcomingActivity {
                activity: activity.clone(),
                date: day.date,
                trip_name: active_trip.name.clone(),
            })
        })
        .take(UPCOMING_ACTIVITY_LIMIT)
        .collect()
}

/// Orderings offered by the trip list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripSort {
    /// Newest first by creation time
    #[default]
    Recent,
    /// Oldest first by creation time
    Oldest,
    /// Alphabetical by name, ignoring case
    Name,
    /// Earliest start date first
    StartDate,
    /// Largest budget first
    Budget,
}

/// Filter and sort settings for the trip list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    /// Case-insensitive match on name or destination; blank matches everything
    pub search: String,
    /// Only trips with this status; `None` for all
    pub status: Option<TripStatus>,
    /// Result order
    pub sort: TripSort,
}

fn compare(sort: TripSort, a: &trip::Model, b: &trip::Model) -> Ordering {
    match sort {
        TripSort::Recent => b.created_at.cmp(&a.created_at),
        TripSort::Oldest => a.created_at.cmp(&b.created_at),
        TripSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        TripSort::StartDate => a.start_date.cmp(&b.start_date),
        TripSort::Budget => b.budget.total_cmp(&a.budget),
    }
}

/// Applies `query` to `trips`. The sort is stable.
pub fn filter_trips<'a>(trips: &'a [trip::Model], query: &TripQuery) -> Vec<&'a trip::Model> {
    let needle = query.search.trim().to_lowercase();
    let mut matches: Vec<&trip::Model> = trips
        .iter()
        .filter(|trip| {
            needle.is_empty()
                || trip.name.to_lowercase().contains(&needle)
                || trip.destination.to_lowercase().contains(&needle)
        })
        .filter(|trip| query.status.is_none_or(|status| trip.status == status))
        .collect();
    matches.sort_by(|a, b| compare(query.sort, a, b));
    matches
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Totals across every trip
    pub stats: TripStats,
    /// The active trip, if any
    pub current_trip: Option<trip::Model>,
    /// Trips starting soon
    pub upcoming_trips: Vec<trip::Model>,
    /// Next activities of the active trip
    pub upcoming_activities: Vec<UpcomingActivity>,
}

/// Loads the dashboard as of `today`.
#[instrument(skip(store))]
pub async fn load_dashboard(store: &Store, today: NaiveDate) -> Result<Dashboard> {
    let trips = get_all_trips(store).await?;
    let current_trip = trips.iter().find(|trip| trip.is_active()).cloned();

    let upcoming_activities = match &current_trip {
        Some(trip) => upcoming_activities(store, trip, today).await,
        None => Vec::new(),
    };

    Ok(Dashboard {
        stats: TripStats::from_trips(&trips),
        upcoming_trips: upcoming_trips(&trips, today).into_iter().cloned().collect(),
        current_trip,
        upcoming_activities,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::trip::{TripPatch, update_trip};
    use crate::test_utils::*;

    fn names<'a>(trips: &[&'a trip::Model]) -> Vec<&'a str> {
        trips.iter().map(|t| t.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_trip_stats_and_counts() -> Result<()> {
        let store = setup_seeded_store().await?;
        let trips = get_all_trips(&store).await?;

        let stats = TripStats::from_trips(&trips);
        assert_eq!(stats.total_trips, 3);
        assert_eq!(stats.active_trips, 1);
        assert_eq!(stats.completed_trips, 1);
        assert_eq!(stats.total_budget, 3500.0 + 2800.0 + 1800.0);

        assert_eq!(
            status_counts(&trips),
            StatusCounts {
                all: 3,
                planning: 1,
                active: 1,
                completed: 1
            }
        );
        assert_eq!(TripStats::from_trips(&[]), TripStats::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_trips() -> Result<()> {
        let store = setup_seeded_store().await?;
        for (name, start) in [
            ("A", "2024-07-01"),
            ("B", "2024-08-01"),
            ("C", "2024-09-01"),
        ] {
            create_trip_between(&store, name, start, "2024-12-31").await?;
        }
        let trips = get_all_trips(&store).await?;

        // Bali is completed, Tokyo has started; Paris plus the first two new trips fit
        let upcoming = upcoming_trips(&trips, date("2024-03-20"));
        assert_eq!(names(&upcoming), vec!["Paris Getaway", "A", "B"]);

        // Starting today is not upcoming
        let upcoming = upcoming_trips(&trips, date("2024-09-01"));
        assert!(upcoming.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_activities() -> Result<()> {
        let store = setup_seeded_store().await?;
        let tokyo = get_all_trips(&store).await?.remove(0);

        let all = upcoming_activities(&store, &tokyo, date("2024-03-01")).await;
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|a| a.trip_name == "Tokyo Adventure"));
        assert_eq!(all[0].date, date("2024-03-15"));

        // Day one is past; today counts
        let later = upcoming_activities(&store, &tokyo, date("2024-03-16")).await;
        assert!(later.iter().all(|a| a.date == date("2024-03-16")));
        assert!(!later.is_empty());

        let after = upcoming_activities(&store, &tokyo, date("2025-01-01")).await;
        assert!(after.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_upcoming_activities_capped_at_five() -> Result<()> {
        let store = setup_empty_store().await?;
        let trip = create_trip_between(&store, "Long", "2024-06-01", "2024-06-05").await?;
        crate::core::itinerary::generate_itinerary(&store, &trip).await?;

        let upcoming = upcoming_activities(&store, &trip, date("2024-06-01")).await;
        assert_eq!(upcoming.len(), UPCOMING_ACTIVITY_LIMIT);
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_trips() -> Result<()> {
        let store = setup_seeded_store().await?;
        let trips = get_all_trips(&store).await?;

        let query = TripQuery {
            search: "  JAPAN ".to_string(),
            ..TripQuery::default()
        };
        assert_eq!(names(&filter_trips(&trips, &query)), vec!["Tokyo Adventure"]);

        let query = TripQuery {
            status: Some(TripStatus::Completed),
            ..TripQuery::default()
        };
        assert_eq!(names(&filter_trips(&trips, &query)), vec!["Bali Retreat"]);

        let by = |sort| TripQuery {
            sort,
            ..TripQuery::default()
        };
        assert_eq!(
            names(&filter_trips(&trips, &by(TripSort::Name))),
            vec!["Bali Retreat", "Paris Getaway", "Tokyo Adventure"]
        );
        assert_eq!(
            names(&filter_trips(&trips, &by(TripSort::StartDate))),
            vec!["Bali Retreat", "Tokyo Adventure", "Paris Getaway"]
        );
        assert_eq!(
            names(&filter_trips(&trips, &by(TripSort::Budget))),
            vec!["Tokyo Adventure", "Paris Getaway", "Bali Retreat"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_filter_trips_by_creation_time() -> Result<()> {
        let store = setup_empty_store().await?;
        create_test_trip(&store, "First").await?;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        create_test_trip(&store, "Second").await?;
        let trips = get_all_trips(&store).await?;

        let recent = TripQuery::default();
        assert_eq!(names(&filter_trips(&trips, &recent)), vec!["Second", "First"]);
        let oldest = TripQuery {
            sort: TripSort::Oldest,
            ..TripQuery::default()
        };
        assert_eq!(names(&filter_trips(&trips, &oldest)), vec!["First", "Second"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_dashboard() -> Result<()> {
        let store = setup_seeded_store().await?;

        let dashboard = load_dashboard(&store, date("2024-03-16")).await?;
        assert_eq!(dashboard.stats.total_trips, 3);
        assert_eq!(dashboard.current_trip.as_ref().unwrap().id, 1);
        assert_eq!(dashboard.upcoming_trips.len(), 1);
        assert!(!dashboard.upcoming_activities.is_empty());

        update_trip(&store, 1, TripPatch::status(TripStatus::Completed)).await?;
        let dashboard = load_dashboard(&store, date("2024-03-16")).await?;
        assert!(dashboard.current_trip.is_none());
        assert!(dashboard.upcoming_activities.is_empty());
        assert_eq!(dashboard.stats.completed_trips, 2);
        Ok(())
    }
}
