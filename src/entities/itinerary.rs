//! Itinerary entity - The day-partitioned activity schedule of one trip.

use super::common::Days;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Itinerary database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "itineraries")]
pub struct Model {
    /// Unique identifier for the itinerary
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip this itinerary belongs to (weak reference)
    pub trip_id: i64,
    /// Days in date order, each with its activities and weather
    #[sea_orm(column_type = "Json")]
    pub days: Days,
    /// Sum of all activity costs at generation time
    pub total_cost: f64,
    /// Stamped on create and on every update
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
