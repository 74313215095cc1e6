//! Activity entity - The browsable catalog of plannable items.
//!
//! Itineraries embed their own generated activities (see
//! [`PlannedActivity`](super::common::PlannedActivity)); those never land in this table.

use super::common::{ActivityType, Location, StringList};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog activity database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    /// Unique identifier for the activity
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Historic Museum")
    pub name: String,
    /// Kind of activity
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Where it happens
    #[sea_orm(column_type = "Json")]
    pub location: Location,
    /// Duration in minutes
    pub duration: i32,
    /// Cost in currency units
    pub cost: f64,
    /// Suggested start time as `HH:MM`
    pub time: String,
    /// Free-form description
    pub description: String,
    /// Labels used for browsing
    #[sea_orm(column_type = "Json")]
    pub tags: StringList,
    /// When the activity was added; fixture rows have none
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
