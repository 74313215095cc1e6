//! Budget repository - Per-trip category ceilings.
//!
//! A budget holds five category ceilings. Each trip is expected to have at most
//! one; lookups by trip return the first match.

use crate::{
    entities::{Budget, budget},
    errors::{Error, Result},
    store::{Operation, Store},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The five spending buckets tracked per trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    /// Lodging
    Accommodation,
    /// Getting around
    Transport,
    /// Tours and sights
    Activities,
    /// Meals
    Food,
    /// Everything else
    Other,
}

impl BudgetCategory {
    /// All categories in display order.
    pub const ALL: [Self; 5] = [
        Self::Accommodation,
        Self::Transport,
        Self::Activities,
        Self::Food,
        Self::Other,
    ];

    /// The ceiling stored for this category.
    pub const fn ceiling(self, budget: &budget::Model) -> f64 {
        match self {
            Self::Accommodation => budget.accommodation,
            Self::Transport => budget.transport,
            Self::Activities => budget.activities,
            Self::Food => budget.food,
            Self::Other => budget.other,
        }
    }
}

/// Fields supplied when creating a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    /// Owning trip
    pub trip_id: i64,
    /// Lodging ceiling
    pub accommodation: f64,
    /// Transport ceiling
    pub transport: f64,
    /// Activities ceiling
    pub activities: f64,
    /// Food ceiling
    pub food: f64,
    /// Everything else
    pub other: f64,
}

/// A shallow patch over a budget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    /// Move the budget to another trip
    pub trip_id: Option<i64>,
    /// New lodging ceiling
    pub accommodation: Option<f64>,
    /// New transport ceiling
    pub transport: Option<f64>,
    /// New activities ceiling
    pub activities: Option<f64>,
    /// New food ceiling
    pub food: Option<f64>,
    /// New ceiling for everything else
    pub other: Option<f64>,
}

impl BudgetPatch {
    /// Returns true when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply(self, model: &mut budget::ActiveModel) {
        if let Some(trip_id) = self.trip_id {
            model.trip_id = Set(trip_id);
        }
        if let Some(accommodation) = self.accommodation {
            model.accommodation = Set(accommodation);
        }
        if let Some(transport) = self.transport {
            model.transport = Set(transport);
        }
        if let Some(activities) = self.activities {
            model.activities = Set(activities);
        }
        if let Some(food) = self.food {
            model.food = Set(food);
        }
        if let Some(other) = self.other {
            model.other = Set(other);
        }
    }
}

/// Sum of the five category ceilings. Ids and timestamps are not amounts and are ignored.
#[must_use]
pub fn total_allocation(budget: &budget::Model) -> f64 {
    BudgetCategory::ALL
        .iter()
        .map(|category| category.ceiling(budget))
        .sum()
}

/// Retrieves every budget.
#[instrument(skip(store))]
pub async fn get_all_budgets(store: &Store) -> Result<Vec<budget::Model>> {
    store.simulate_latency(Operation::List).await;
    Budget::find()
        .order_by_asc(budget::Column::Id)
        .all(store.db())
        .await
        .map_err(Into::into)
}

/// Finds a budget by id.
#[instrument(skip(store))]
pub async fn get_budget_by_id(store: &Store, budget_id: i64) -> Result<Option<budget::Model>> {
    store.simulate_latency(Operation::Get).await;
    Budget::find_by_id(budget_id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Finds the first budget belonging to `trip_id`.
#[instrument(skip(store))]
pub async fn get_budget_by_trip_id(store: &Store, trip_id: i64) -> Result<Option<budget::Model>> {
    store.simulate_latency(Operation::Lookup).await;
    Budget::find()
        .filter(budget::Column::TripId.eq(trip_id))
        .order_by_asc(budget::Column::Id)
        .one(store.db())
        .await
        .map_err(Into::into)
}

/// Creates a budget, stamping its creation time.
#[instrument(skip(store, new_budget), fields(trip_id = new_budget.trip_id))]
pub async fn create_budget(store: &Store, new_budget: NewBudget) -> Result<budget::Model> {
    store.simulate_latency(Operation::Create).await;

    let model = budget::ActiveModel {
        trip_id: Set(new_budget.trip_id),
        accommodation: Set(new_budget.accommodation),
        transport: Set(new_budget.transport),
        activities: Set(new_budget.activities),
        food: Set(new_budget.food),
        other: Set(new_budget.other),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    };

    model.insert(store.db()).await.map_err(Into::into)
}

/// Merges `patch` into a budget.
///
/// # Errors
/// [`Error::NotFound`] when no budget has `budget_id`.
#[instrument(skip(store, patch))]
pub async fn update_budget(
    store: &Store,
    budget_id: i64,
    patch: BudgetPatch,
) -> Result<budget::Model> {
    store.simulate_latency(Operation::Update).await;

    let existing = Budget::find_by_id(budget_id)
        .one(store.db())
        .await?
        .ok_or_else(|| Error::not_found("Budget", budget_id))?;

    if patch.is_empty() {
        return Ok(existing);
    }

    let mut model: budget::ActiveModel = existing.into();
    patch.apply(&mut model);
    model.update(store.db()).await.map_err(Into::into)
}

/// Deletes a budget.
///
/// # Errors
/// [`Error::NotFound`] when no budget has `budget_id`.
#[instrument(skip(store))]
pub async fn delete_budget(store: &Store, budget_id: i64) -> Result<()> {
    store.simulate_latency(Operation::Delete).await;

    let result = Budget::delete_by_id(budget_id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Budget", budget_id));
    }
    Ok(())
}

/// Sums the category ceilings of `budget`.
#[instrument(skip(store, budget), fields(budget_id = budget.id))]
pub async fn calculate_total_budget(store: &Store, budget: &budget::Model) -> Result<f64> {
    store.simulate_latency(Operation::TotalBudget).await;
    Ok(total_allocation(budget))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_budget_by_trip_id() -> Result<()> {
        let store = setup_seeded_store().await?;

        let tokyo = get_budget_by_trip_id(&store, 1).await?.unwrap();
        assert_eq!(tokyo.id, 1);
        assert_eq!(tokyo.accommodation, 1400.0);

        assert!(get_budget_by_trip_id(&store, 3).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_first_budget_wins_for_trip() -> Result<()> {
        let store = setup_empty_store().await?;
        let first = create_budget(&store, new_budget(5, [1.0, 1.0, 1.0, 1.0, 1.0])).await?;
        create_budget(&store, new_budget(5, [2.0, 2.0, 2.0, 2.0, 2.0])).await?;

        let found = get_budget_by_trip_id(&store, 5).await?.unwrap();
        assert_eq!(found.id, first.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_calculate_total_budget_sums_categories() -> Result<()> {
        let store = setup_seeded_store().await?;
        let tokyo = get_budget_by_id(&store, 1).await?.unwrap();

        let total = calculate_total_budget(&store, &tokyo).await?;
        assert_eq!(total, 1400.0 + 600.0 + 500.0 + 700.0 + 300.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_crud() -> Result<()> {
        let store = setup_empty_store().await?;

        let payload = new_budget(9, [500.0, 200.0, 150.0, 300.0, 50.0]);
        let created = create_budget(&store, payload).await?;
        assert!(created.created_at.is_some());
        assert_eq!(total_allocation(&created), 1200.0);

        let updated = update_budget(
            &store,
            created.id,
            BudgetPatch {
                food: Some(350.0),
                ..BudgetPatch::default()
            },
        )
        .await?;
        assert_eq!(updated.food, 350.0);
        assert_eq!(updated.accommodation, 500.0);
        assert_eq!(updated.trip_id, 9);

        assert_eq!(
            update_budget(&store, created.id, BudgetPatch::default()).await?,
            updated
        );

        assert_eq!(get_all_budgets(&store).await?.len(), 1);
        delete_budget(&store, created.id).await?;
        assert!(get_budget_by_id(&store, created.id).await?.is_none());
        assert!(matches!(
            delete_budget(&store, created.id).await,
            Err(Error::NotFound {
                entity: "Budget",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_category_ceilings() {
        let budget = budget::Model {
            id: 1,
            trip_id: 1,
            accommodation: 1.0,
            transport: 2.0,
            activities: 3.0,
            food: 4.0,
            other: 5.0,
            created_at: None,
        };
        let ceilings: Vec<f64> = BudgetCategory::ALL
            .iter()
            .map(|c| c.ceiling(&budget))
            .collect();
        assert_eq!(ceilings, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
