//! Budget entity - Per-trip spending ceilings across five categories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Trip this budget belongs to (weak reference)
    pub trip_id: i64,
    /// Ceiling for lodging
    pub accommodation: f64,
    /// Ceiling for getting around
    pub transport: f64,
    /// Ceiling for tours and sights
    pub activities: f64,
    /// Ceiling for meals
    pub food: f64,
    /// Ceiling for everything else
    pub other: f64,
    /// When the budget was created; fixture rows have none
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
