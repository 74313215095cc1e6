//! Value types shared between entities.
//!
//! Enums are stored as text columns; nested records (locations, label lists,
//! itinerary days) are stored as JSON columns.

use chrono::NaiveDate;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a trip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    /// Being prepared; every newly created trip starts here
    #[sea_orm(string_value = "planning")]
    Planning,
    /// Currently under way; at most one trip holds this status
    #[sea_orm(string_value = "active")]
    Active,
    /// Finished
    #[sea_orm(string_value = "completed")]
    Completed,
}

/// Kind of plannable item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    /// Sights, museums, parks
    #[sea_orm(string_value = "attraction")]
    Attraction,
    /// Places to eat
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
    /// Tours, classes, experiences
    #[sea_orm(string_value = "activity")]
    Activity,
    /// Getting from A to B
    #[sea_orm(string_value = "transport")]
    Transport,
    /// Lodging
    #[sea_orm(string_value = "hotel")]
    Hotel,
}

/// A named point on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Location {
    /// Display name, e.g. "Old Town"
    pub name: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

/// A list of free-form labels (trip interests, activity tags).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl StringList {
    /// Returns true when the list holds `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|item| item == value)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for StringList {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl<'a> From<Vec<&'a str>> for StringList {
    fn from(values: Vec<&'a str>) -> Self {
        Self(values.into_iter().map(str::to_string).collect())
    }
}

/// Sky condition of a synthetic weather reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    /// Clear skies
    Sunny,
    /// Overcast
    Cloudy,
    /// Precipitation
    Rainy,
}

/// Placeholder weather reading attached to an itinerary day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    /// Degrees Celsius
    pub temperature: i32,
    /// Sky condition
    pub condition: WeatherCondition,
    /// Relative humidity percentage
    pub humidity: i32,
}

/// An activity placed inside an itinerary day.
///
/// Same shape as a catalog activity but with its own identity; these are never
/// written back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedActivity {
    /// Synthetic identifier, unique within one generated itinerary
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of activity
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Where it happens
    pub location: Location,
    /// Duration in minutes
    pub duration: i32,
    /// Cost in currency units
    pub cost: f64,
    /// Start time as `HH:MM`
    pub time: String,
    /// Index of the itinerary day this activity was assigned to
    pub day_index: usize,
    /// Free-form description
    pub description: String,
    /// Labels
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One calendar date within an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// The calendar date
    pub date: NaiveDate,
    /// Activities scheduled for this date, unordered
    pub activities: Vec<PlannedActivity>,
    /// Synthetic weather reading
    pub weather: Weather,
}

impl Day {
    /// Sum of the costs of this day's activities.
    pub fn total_cost(&self) -> f64 {
        self.activities.iter().map(|activity| activity.cost).sum()
    }
}

/// The ordered days of an itinerary, stored as one JSON column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Days(pub Vec<Day>);

impl Days {
    /// Iterates over the days in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Day> {
        self.0.iter()
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no days.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of activities across all days.
    pub fn activity_count(&self) -> usize {
        self.0.iter().map(|day| day.activities.len()).sum()
    }
}

impl From<Vec<Day>> for Days {
    fn from(days: Vec<Day>) -> Self {
        Self(days)
    }
}
