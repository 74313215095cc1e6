//! Activity repository - The browsable catalog.
//!
//! Besides CRUD this offers two filters: `search_activities` (text, type, and a
//! cost ceiling) and `explore_activities` (the browse view: text also matches the
//! location name, costs are bucketed into price ranges).

use crate::{
    entities::{Activity, ActivityType, Location, StringList, activity},
    errors::{Error, Result},
    store::{Operation, Store},
};
use chrono::Utc;
use sea_orm::{Condition, QueryOrder, Select, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Fields supplied when adding an activity to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    /// Display name
    pub name: String,
    /// Kind of activity
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Where it happens
    pub location: Location,
    /// Minutes
    pub duration: i32,
    /// Currency units
    pub cost: f64,
    /// `HH:MM`
    pub time: String,
    /// Description
    pub description: String,
    /// Labels
    pub tags: Vec<String>,
}

/// A shallow patch over a catalog activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityPatch {
    /// New name
    pub name: Option<String>,
    /// New type
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    /// New location
    pub location: Option<Location>,
    /// New duration
    pub duration: Option<i32>,
    /// New cost
    pub cost: Option<f64>,
    /// New time
    pub time: Option<String>,
    /// New description
    pub description: Option<String>,
    /// Replacement tags
    pub tags: Option<Vec<String>>,
}

impl ActivityPatch {
    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(self, model: &mut activity::ActiveModel) {
        if let Some(name) = self.name {
            model.name = Set(name);
        }
        if let Some(activity_type) = self.activity_type {
            model.activity_type = Set(activity_type);
        }
        if let Some(location) = self.location {
            model.location = Set(location);
        }
        if let Some(duration) = self.duration {
            model.duration = Set(duration);
        }
        if let Some(cost) = self.cost {
            model.cost = Set(cost);
        }
        if let Some(time) = self.time {
            model.time = Set(time);
        }
        if let Some(description) = self.description {
            model.description = Set(description);
        }
        if let Some(tags) = self.tags {
            model.tags = Set(StringList(tags));
        }
    }
}

/// Optional filters for [`search_activities`]; all present filters must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityFilters {
    /// Exact type match
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    /// Inclusive cost ceiling
    pub max_cost: Option<f64>,
}

/// Price buckets offered by the browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    /// 0 to 25
    Budget,
    /// 26 to 75
    Moderate,
    /// 76 to 150
    Premium,
    /// 150 and up
    Luxury,
}

impl PriceRange {
    /// Inclusive lower bound.
    pub const fn min(self) -> f64 {
        match self {
            Self::Budget => 0.0,
            Self::Moderate => 26.0,
            Self::Premium => 76.0,
            Self::Luxury => 150.0,
        }
    }

    /// Inclusive upper bound.
    pub const fn max(self) -> f64 {
        match self {
            Self::Budget => 25.0,
            Self::Moderate => 75.0,
            Self::Premium => 150.0,
            Self::Luxury => f64::INFINITY,
        }
    }

    /// Returns true when `cost` falls inside the range.
    pub fn contains(self, cost: f64) -> bool {
        cost >= self.min() && cost <= self.max()
    }
}

/// Query for [`explore_activities`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExploreQuery {
    /// Matched against name, description, and location name; blank matches all
    pub text: String,
    /// Exact type match
    pub activity_type: Option<ActivityType>,
    /// Price bucket
    pub price_range: Option<PriceRange>,
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn typed_query(activity_type: Option<ActivityType>) -> Select<Activity> {
    let mut condition = Condition::all();
    if let Some(activity_type) = activity_type {
        condition = condition.add(activity::Column::ActivityType.eq(activity_type));
    }
    Activity::find()
        .filter(condition)
        .order_by_asc(activity::Column::Id)
}

/// Retrieves the whole catalog.
#[instrument(skip(store))]
pub async fn get_all_activities(store: &Store) -> Result<Vec<activity::Model>> {
    store.simulate_latency(Operation::List).await;
    Activity::find()
        .order_by_asc(activity::Column::Id)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a catalog activity by id.
#[instrument(skip(store))]
pub async fn get_activity_by_id(
    store: &Store,
    activity_id: i64,
) -> Result<Option<activity::Model>> {
    store.simulate_latency(Operation::Get).await;
    Activity::find_by_id(activity_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Retrieves every catalog activity of the given type.
#[instrument(skip(store))]
pub async fn get_activities_by_type(
    store: &Store,
    activity_type: ActivityType,
) -> Result<Vec<activity::Model>> {
    store.simulate_latency(Operation::Lookup).await;
    typed_query(Some(activity_type))
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Searches the catalog.
///
/// `query` is matched case-insensitively as a substring of the name or the
/// description; an empty query matches everything. Type and cost filters are
/// applied on top.
#[instrument(skip(store))]
pub async fn search_activities(
    store: &Store,
    query: &str,
    filters: ActivityFilters,
) -> Result<Vec<activity::Model>> {
    store.simulate_latency(Operation::Search).await;

    let mut select = typed_query(filters.activity_type);
    if let Some(max_cost) = filters.max_cost {
        select = select.filter(activity::Column::Cost.lte(max_cost));
    }
    let candidates = select.all(store.db()).await?;

    let needle = query.to_lowercase();
    let results: Vec<activity::Model> = candidates
        .into_iter()
        .filter(|a| {
            needle.is_empty()
                || contains_ignore_case(&a.name, &needle)
                || contains_ignore_case(&a.description, &needle)
        })
        .collect();

    debug!("Search matched {} activities", results.len());
    Ok(results)
}

/// Filters the catalog the way the browse view does.
#[instrument(skip(store))]
pub async fn explore_activities(
    store: &Store,
    query: &ExploreQuery,
) -> Result<Vec<activity::Model>> {
    store.simulate_latency(Operation::Search).await;

    let candidates = typed_query(query.activity_type).all(store.db()).await?;

    let needle = query.text.trim().to_lowercase();
    Ok(candidates
        .into_iter()
        .filter(|a| {
            needle.is_empty()
                || contains_ignore_case(&a.name, &needle)
                || contains_ignore_case(&a.description, &needle)
                || contains_ignore_case(&a.location.name, &needle)
        })
        .filter(|a| query.price_range.is_none_or(|range| range.contains(a.cost)))
        .collect())
}

/// Adds an activity to the catalog.
#[instrument(skip(store, new_activity), fields(name = %new_activity.name))]
pub async fn create_activity(store: &Store, new_activity: NewActivity) -> Result<activity::Model> {
    store.simulate_latency(Operation::Create).await;

    let model = activity::ActiveModel {
        name: Set(new_activity.name),
        activity_type: Set(new_activity.activity_type),
        location: Set(new_activity.location),
        duration: Set(new_activity.duration),
        cost: Set(new_activity.cost),
        time: Set(new_activity.time),
        description: Set(new_activity.description),
        tags: Set(StringList(new_activity.tags)),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    };

    model.insert(store.db()).await.map_err(Into::into)
}

/// Merges `patch` into a catalog activity.
///
/// # Errors
/// [`Error::NotFound`] when no activity has `activity_id`.
#[instrument(skip(store, patch))]
pub async fn update_activity(
    store: &Store,
    activity_id: i64,
    patch: ActivityPatch,
) -> Result<activity::Model> {
    store.simulate_latency(Operation::Update).await;

    let existing = Activity::find_by_id(activity_id)
        .one(store.db())
        .await?
        .ok_or_else(|| Error::not_found("Activity", activity_id))?;

    if patch.is_empty() {
        return Ok(existing);
    }

    let mut model: activity::ActiveModel = existing.into();
    patch.apply(&mut model);
    model.update(store.db()).await.map_err(Into::into)
}

/// Removes an activity from the catalog.
///
/// # Errors
/// [`Error::NotFound`] when no activity has `activity_id`.
#[instrument(skip(store))]
pub async fn delete_activity(store: &Store, activity_id: i64) -> Result<()> {
    store.simulate_latency(Operation::Delete).await;

    let result = Activity::delete_by_id(activity_id)
        .exec(store.db())
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Activity", activity_id));
    }
    Ok(())
}
