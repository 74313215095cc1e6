//! Itinerary generation.
//!
//! Builds a day-partitioned schedule for a trip from a fixed pool of synthetic
//! activities. Generation is pure: every random draw comes from the caller's
//! RNG, so a seeded RNG gives an exact, repeatable result.
//!
//! The pool always holds [`POOL_SIZE`] activities, four per day, so only the
//! first three days of a trip receive activities. Later days still appear, with
//! weather but no activities.

use crate::entities::{
    ActivityType, Day, Days, Location, PlannedActivity, Weather, WeatherCondition, trip,
};
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Number of activities synthesized per itinerary.
pub const POOL_SIZE: usize = 12;

/// Activities assigned to each day.
pub const ACTIVITIES_PER_DAY: usize = 4;

/// Map centre used for every generated activity.
pub const BASE_COORDINATES: (f64, f64) = (40.7128, -74.0060);

const COORDINATE_JITTER: f64 = 0.05;

const TYPE_CYCLE: [ActivityType; 4] = [
    ActivityType::Attraction,
    ActivityType::Restaurant,
    ActivityType::Activity,
    ActivityType::Transport,
];

const DISTRICTS: [&str; 5] = [
    "Downtown",
    "Old Town",
    "Marina District",
    "Cultural Quarter",
    "Shopping District",
];

const CONDITIONS: [WeatherCondition; 3] = [
    WeatherCondition::Sunny,
    WeatherCondition::Cloudy,
    WeatherCondition::Rainy,
];

const GENERATED_DESCRIPTION: &str = "AI-generated activity based on your preferences";

/// Candidate names for a generated activity of the given type.
pub const fn names_for(activity_type: ActivityType) -> &'static [&'static str] {
    match activity_type {
        ActivityType::Attraction => &[
            "Historic Museum",
            "Art Gallery",
            "City Park",
            "Observatory",
            "Monument",
        ],
        ActivityType::Restaurant => &[
            "Local Bistro",
            "Rooftop Restaurant",
            "Street Food Market",
            "Fine Dining",
            "Cafe",
        ],
        ActivityType::Activity => &[
            "Walking Tour",
            "Boat Cruise",
            "Cooking Class",
            "Shopping",
            "Spa",
        ],
        ActivityType::Transport => &[
            "Taxi Ride",
            "Metro Trip",
            "Bus Tour",
            "Car Rental",
            "Airport Transfer",
        ],
        ActivityType::Hotel => &["Activity"],
    }
}

/// Start time of the `index`-th pooled activity: 08:00, 08:30, 09:00, ...
pub fn slot_time(index: usize) -> String {
    let hour = 8 + index / 2;
    let minutes = if index % 2 == 0 { "00" } else { "30" };
    format!("{hour:02}:{minutes}")
}

/// Days spanned by `start..=end`; zero when `end` precedes `start`.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> usize {
    usize::try_from((end - start).num_days() + 1).unwrap_or(0)
}

/// The generated schedule before it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryDraft {
    /// Days in date order
    pub days: Days,
    /// Every pooled activity, including those that fell on no day
    pub activities: Vec<PlannedActivity>,
    /// Sum of every pooled activity's cost
    pub total_cost: f64,
}

/// Synthesizes the fixed activity pool. `stamp` makes the ids unique per run.
pub fn synthesize_activities<R: Rng + ?Sized>(rng: &mut R, stamp: i64) -> Vec<PlannedActivity> {
    (0..POOL_SIZE)
        .map(|index| {
            let activity_type = TYPE_CYCLE[index % TYPE_CYCLE.len()];
            let name = names_for(activity_type)
                .choose(rng)
                .copied()
                .unwrap_or("Activity");
            let lat = BASE_COORDINATES.0 + rng.random_range(-COORDINATE_JITTER..COORDINATE_JITTER);
            let lng = BASE_COORDINATES.1 + rng.random_range(-COORDINATE_JITTER..COORDINATE_JITTER);
            let duration = rng.random_range(30..150);
            let cost = f64::from(rng.random_range(20..120_i32));

            PlannedActivity {
                id: format!("activity_{stamp}_{index}"),
                name: name.to_string(),
                activity_type,
                location: Location {
                    name: DISTRICTS[index % DISTRICTS.len()].to_string(),
                    lat,
                    lng,
                },
                duration,
                cost,
                time: slot_time(index),
                day_index: index / ACTIVITIES_PER_DAY,
                description: GENERATED_DESCRIPTION.to_string(),
                tags: Vec::new(),
            }
        })
        .collect()
}

/// A synthetic weather reading.
pub fn synthesize_weather<R: Rng + ?Sized>(rng: &mut R) -> Weather {
    let temperature = rng.random_range(15..35);
    let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
    let humidity = rng.random_range(40..80);
    Weather {
        temperature,
        condition,
        humidity,
    }
}

/// Groups `activities` into one [`Day`] per date in `start..=end`.
pub fn partition_days<R: Rng + ?Sized>(
    rng: &mut R,
    activities: &[PlannedActivity],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Day> {
    start
        .iter_days()
        .take(day_count(start, end))
        .enumerate()
        .map(|(index, date)| Day {
            date,
            activities: activities
                .iter()
                .filter(|activity| activity.day_index == index)
                .cloned()
                .collect(),
            weather: synthesize_weather(rng),
        })
        .collect()
}

/// Generates the schedule for `trip`.
pub fn draft_itinerary<R: Rng + ?Sized>(
    trip: &trip::Model,
    rng: &mut R,
    stamp: i64,
) -> ItineraryDraft {
    let activities = synthesize_activities(rng, stamp);
    let days = partition_days(rng, &activities, trip.start_date, trip.end_date);
    let total_cost = activities.iter().map(|activity| activity.cost).sum();

    ItineraryDraft {
        days: Days(days),
        activities,
        total_cost,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::TripStatus;
    use crate::test_utils::date;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn trip_between(start: &str, end: &str) -> trip::Model {
        trip::Model {
            id: 11,
            name: "Generated".to_string(),
            destination: "New York, USA".to_string(),
            start_date: date(start),
            end_date: date(end),
            budget: 2000.0,
            travelers: 2,
            interests: vec!["food"].into(),
            status: TripStatus::Planning,
            accommodation_type: None,
            transport_mode: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_three_day_scenario() {
        let mut rng = StdRng::seed_from_u64(1);
        let draft = draft_itinerary(&trip_between("2024-06-01", "2024-06-03"), &mut rng, 0);

        assert_eq!(draft.days.len(), 3);
        let dates: Vec<NaiveDate> = draft.days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-06-01"), date("2024-06-02"), date("2024-06-03")]
        );
        for (index, day) in draft.days.iter().enumerate() {
            assert_eq!(day.activities.len(), 4);
            assert!(day.activities.iter().all(|a| a.day_index == index));
        }
        let first_day_ids: Vec<&str> = draft.days.0[0]
            .activities
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(
            first_day_ids,
            vec!["activity_0_0", "activity_0_1", "activity_0_2", "activity_0_3"]
        );
    }

    #[test]
    fn test_long_trip_only_fills_first_three_days() {
        let mut rng = StdRng::seed_from_u64(2);
        let draft = draft_itinerary(&trip_between("2024-03-01", "2024-03-10"), &mut rng, 0);

        assert_eq!(draft.days.len(), 10);
        assert_eq!(draft.days.activity_count(), POOL_SIZE);
        assert!(draft.days.iter().skip(3).all(|d| d.activities.is_empty()));
    }

    #[test]
    fn test_short_trip_drops_unplaced_activities_but_counts_their_cost() {
        let mut rng = StdRng::seed_from_u64(3);
        let draft = draft_itinerary(&trip_between("2024-06-01", "2024-06-01"), &mut rng, 0);

        assert_eq!(draft.days.len(), 1);
        assert_eq!(draft.days.activity_count(), 4);
        assert_eq!(draft.activities.len(), POOL_SIZE);
        let pool_cost: f64 = draft.activities.iter().map(|a| a.cost).sum();
        assert_eq!(draft.total_cost, pool_cost);
    }

    #[test]
    fn test_reversed_dates_give_no_days() {
        let mut rng = StdRng::seed_from_u64(4);
        let draft = draft_itinerary(&trip_between("2024-06-05", "2024-06-01"), &mut rng, 0);
        assert!(draft.days.is_empty());
        assert_eq!(draft.activities.len(), POOL_SIZE);
    }

    #[test]
    fn test_pool_shape() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = synthesize_activities(&mut rng, 99);

        assert_eq!(pool.len(), POOL_SIZE);
        for (i, activity) in pool.iter().enumerate() {
            assert_eq!(activity.activity_type, TYPE_CYCLE[i % 4]);
            assert_eq!(activity.location.name, DISTRICTS[i % 5]);
            assert_eq!(activity.day_index, i / 4);
            assert_eq!(activity.time, slot_time(i));
            assert!(names_for(activity.activity_type).contains(&activity.name.as_str()));
            assert!((30..150).contains(&activity.duration));
            assert!(activity.cost >= 20.0 && activity.cost < 120.0);
            assert_eq!(activity.cost.fract(), 0.0);
            let bound = COORDINATE_JITTER + 1e-9;
            assert!((activity.location.lat - BASE_COORDINATES.0).abs() <= bound);
            assert!((activity.location.lng - BASE_COORDINATES.1).abs() <= bound);
            assert_eq!(activity.id, format!("activity_99_{i}"));
        }
    }

    #[test]
    fn test_slot_times() {
        assert_eq!(slot_time(0), "08:00");
        assert_eq!(slot_time(1), "08:30");
        assert_eq!(slot_time(2), "09:00");
        assert_eq!(slot_time(11), "13:30");
    }

    #[test]
    fn test_weather_ranges() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let weather = synthesize_weather(&mut rng);
            assert!((15..35).contains(&weather.temperature));
            assert!((40..80).contains(&weather.humidity));
        }
    }

    #[test]
    fn test_same_seed_same_itinerary() {
        let trip = trip_between("2024-06-01", "2024-06-04");
        let a = draft_itinerary(&trip, &mut StdRng::seed_from_u64(42), 7);
        let b = draft_itinerary(&trip, &mut StdRng::seed_from_u64(42), 7);
        assert_eq!(a, b);

        let c = draft_itinerary(&trip, &mut StdRng::seed_from_u64(43), 7);
        assert_ne!(a, c);
    }

    #[test]
    fn test_day_count() {
        assert_eq!(day_count(date("2024-06-01"), date("2024-06-03")), 3);
        assert_eq!(day_count(date("2024-02-28"), date("2024-03-01")), 3);
        assert_eq!(day_count(date("2024-06-03"), date("2024-06-01")), 0);
    }
}
