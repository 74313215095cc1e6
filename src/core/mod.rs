//! Core trip planning logic.
//!
//! Repository functions take a [`Store`](crate::store::Store) reference, wait out
//! the simulated latency for their operation, then run against the database.

/// Activity catalog repository and browse filters
pub mod activity;
/// Per-trip budget repository
pub mod budget;
/// Dashboard statistics and trip list filtering
pub mod dashboard;
/// Pure itinerary generation
pub mod generator;
/// Itinerary repository
pub mod itinerary;
/// Single-trip overview and display shaping
pub mod overview;
/// Trip repository
pub mod trip;
/// Trip wizard validation and flows
pub mod wizard;
