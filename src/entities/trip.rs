//! Trip entity - A user-defined travel plan with dates, budget, and status.
//!
//! Trips are created through the wizard in `planning` status. At most one trip
//! is `active` at a time.

use super::common::{StringList, TripStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Trip database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    /// Unique identifier for the trip
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Tokyo Adventure 2024")
    pub name: String,
    /// Free-form destination (e.g., "Tokyo, Japan")
    pub destination: String,
    /// First day of travel
    pub start_date: Date,
    /// Last day of travel
    pub end_date: Date,
    /// Total budget in currency units
    pub budget: f64,
    /// Number of people travelling
    pub travelers: i32,
    /// Interest ids picked in the wizard (e.g., "culture", "food")
    #[sea_orm(column_type = "Json")]
    pub interests: StringList,
    /// Lifecycle status
    pub status: TripStatus,
    /// Preferred accommodation (e.g., "hotel")
    pub accommodation_type: Option<String>,
    /// Preferred way of getting there (e.g., "flight")
    pub transport_mode: Option<String>,
    /// When the trip was created
    pub created_at: DateTimeUtc,
}

/// Trips are referenced by itineraries and budgets through a plain `trip_id`
/// column, without a foreign key.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Number of calendar days covered, counting both ends. Zero when the end
    /// date precedes the start date.
    pub fn day_count(&self) -> usize {
        let span = (self.end_date - self.start_date).num_days() + 1;
        usize::try_from(span).unwrap_or(0)
    }

    /// Returns true when the trip is currently under way.
    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Active
    }
}
