//! Entity module - Contains all SeaORM entity definitions for the store.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod activity;
pub mod budget;
pub mod common;
pub mod itinerary;
pub mod trip;

// Re-export specific types to avoid conflicts
pub use activity::{Column as ActivityColumn, Entity as Activity, Model as ActivityModel};
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use common::{
    ActivityType, Day, Days, Location, PlannedActivity, StringList, TripStatus, Weather,
    WeatherCondition,
};
pub use itinerary::{Column as ItineraryColumn, Entity as Itinerary, Model as ItineraryModel};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
