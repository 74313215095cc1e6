//! Trip wizard - Draft validation and the plan/revise flows.
//!
//! A [`TripDraft`] is filled in over four steps. Each step has its own checks;
//! [`validate`] runs all of them. `plan_trip` and `revise_trip` refuse an
//! invalid draft with [`Error::Validation`] before touching the store.

use crate::{
    core::{
        itinerary::generate_itinerary,
        trip::{NewTrip, TripPatch, create_trip, update_trip},
    },
    entities::{itinerary, trip},
    errors::{Error, FieldError, Result},
    store::Store,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Accommodation preselected on a new draft.
pub const DEFAULT_ACCOMMODATION: &str = "hotel";

/// Transport preselected on a new draft.
pub const DEFAULT_TRANSPORT: &str = "flight";

/// An interest a traveler can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestOption {
    /// Stored identifier
    pub id: &'static str,
    /// Display label
    pub label: &'static str,
}

impl InterestOption {
    const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label }
    }
}

/// Every interest offered by the wizard.
pub const INTEREST_OPTIONS: [InterestOption; 10] = [
    InterestOption::new("culture", "Culture & History"),
    InterestOption::new("food", "Food & Dining"),
    InterestOption::new("nature", "Nature & Outdoors"),
    InterestOption::new("art", "Art & Museums"),
    InterestOption::new("nightlife", "Nightlife"),
    InterestOption::new("shopping", "Shopping"),
    InterestOption::new("adventure", "Adventure Sports"),
    InterestOption::new("wellness", "Wellness & Spa"),
    InterestOption::new("photography", "Photography"),
    InterestOption::new("beaches", "Beaches"),
];

/// The wizard's steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    /// Name and destination
    Basics,
    /// Start and end date
    Dates,
    /// Budget and party size
    Budget,
    /// Interests and preferences
    Preferences,
}

impl WizardStep {
    /// All steps in order.
    pub const ALL: [Self; 4] = [Self::Basics, Self::Dates, Self::Budget, Self::Preferences];

    /// Step title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Basics => "Trip Basics",
            Self::Dates => "Travel Dates",
            Self::Budget => "Budget & Travelers",
            Self::Preferences => "Preferences",
        }
    }

    /// The following step; the last step stays put.
    pub const fn next(self) -> Self {
        match self {
            Self::Basics => Self::Dates,
            Self::Dates => Self::Budget,
            Self::Budget | Self::Preferences => Self::Preferences,
        }
    }

    /// The preceding step; the first step stays put.
    pub const fn previous(self) -> Self {
        match self {
            Self::Basics | Self::Dates => Self::Basics,
            Self::Budget => Self::Dates,
            Self::Preferences => Self::Budget,
        }
    }
}

/// Trip details as entered in the wizard. Unset fields are `None` or empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDraft {
    /// Trip name
    pub name: String,
    /// Destination
    pub destination: String,
    /// First day
    pub start_date: Option<NaiveDate>,
    /// Last day
    pub end_date: Option<NaiveDate>,
    /// Total budget
    pub budget: Option<f64>,
    /// Party size
    pub travelers: i32,
    /// Selected interest ids, in selection order
    pub interests: Vec<String>,
    /// Preferred accommodation
    pub accommodation_type: String,
    /// Preferred transport
    pub transport_mode: String,
}

impl Default for TripDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            destination: String::new(),
            start_date: None,
            end_date: None,
            budget: None,
            travelers: 1,
            interests: Vec::new(),
            accommodation_type: DEFAULT_ACCOMMODATION.to_string(),
            transport_mode: DEFAULT_TRANSPORT.to_string(),
        }
    }
}

impl TripDraft {
    /// Adds `interest` if absent, removes it if present.
    pub fn toggle_interest(&mut self, interest: &str) {
        if let Some(position) = self.interests.iter().position(|i| i == interest) {
            self.interests.remove(position);
        } else {
            self.interests.push(interest.to_string());
        }
    }

    /// Prefills a draft from a stored trip, for editing.
    pub fn from_trip(trip: &trip::Model) -> Self {
        Self {
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            start_date: Some(trip.start_date),
            end_date: Some(trip.end_date),
            budget: Some(trip.budget),
            travelers: trip.travelers,
            interests: trip.interests.0.clone(),
            accommodation_type: trip
                .accommodation_type
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOMMODATION.to_string()),
            transport_mode: trip
                .transport_mode
                .clone()
                .unwrap_or_else(|| DEFAULT_TRANSPORT.to_string()),
        }
    }

    /// Converts a validated draft into a creation payload.
    ///
    /// # Errors
    /// [`Error::Validation`] listing every failing field.
    pub fn into_new_trip(self) -> Result<NewTrip> {
        let checked = check_draft(&self)?;
        Ok(NewTrip {
            name: self.name.trim().to_string(),
            destination: self.destination.trim().to_string(),
            start_date: checked.start_date,
            end_date: checked.end_date,
            budget: checked.budget,
            travelers: self.travelers,
            interests: self.interests,
            accommodation_type: Some(self.accommodation_type),
            transport_mode: Some(self.transport_mode),
        })
    }

    /// Converts a validated draft into a patch that overwrites every wizard field.
    ///
    /// # Errors
    /// [`Error::Validation`] listing every failing field.
    pub fn into_patch(self) -> Result<TripPatch> {
        let new_trip = self.into_new_trip()?;
        Ok(TripPatch {
            name: Some(new_trip.name),
            destination: Some(new_trip.destination),
            start_date: Some(new_trip.start_date),
            end_date: Some(new_trip.end_date),
            budget: Some(new_trip.budget),
            travelers: Some(new_trip.travelers),
            interests: Some(new_trip.interests),
            status: None,
            accommodation_type: Some(new_trip.accommodation_type),
            transport_mode: Some(new_trip.transport_mode),
        })
    }
}

struct CheckedFields {
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: f64,
}

/// Field errors for a single step. Empty when the step is complete.
pub fn validate_step(draft: &TripDraft, step: WizardStep) -> Vec<FieldError> {
    let mut errors = Vec::new();
    match step {
        WizardStep::Basics => {
            if draft.name.trim().is_empty() {
                errors.push(FieldError::new("name", "Trip name is required"));
            }
            if draft.destination.trim().is_empty() {
                errors.push(FieldError::new("destination", "Destination is required"));
            }
        }
        WizardStep::Dates => {
            if draft.start_date.is_none() {
                errors.push(FieldError::new("start_date", "Start date is required"));
            }
            match (draft.start_date, draft.end_date) {
                (_, None) => errors.push(FieldError::new("end_date", "End date is required")),
                (Some(start), Some(end)) if start >= end => errors.push(FieldError::new(
                    "end_date",
                    "End date must be after start date",
                )),
                _ => {}
            }
        }
        WizardStep::Budget => {
            if !draft.budget.is_some_and(|budget| budget > 0.0) {
                errors.push(FieldError::new("budget", "Valid budget is required"));
            }
            if draft.travelers <= 0 {
                errors.push(FieldError::new(
                    "travelers",
                    "Number of travelers is required",
                ));
            }
        }
        WizardStep::Preferences => {
            if draft.interests.is_empty() {
                errors.push(FieldError::new(
                    "interests",
                    "Please select at least one interest",
                ));
            }
        }
    }
    errors
}

fn check_draft(draft: &TripDraft) -> Result<CheckedFields> {
    let errors: Vec<FieldError> = WizardStep::ALL
        .iter()
        .flat_map(|step| validate_step(draft, *step))
        .collect();

    match (draft.start_date, draft.end_date, draft.budget) {
        (Some(start_date), Some(end_date), Some(budget)) if errors.is_empty() => {
            Ok(CheckedFields {
                start_date,
                end_date,
                budget,
            })
        }
        _ => Err(Error::Validation { errors }),
    }
}

/// Checks every step of `draft`.
///
/// # Errors
/// [`Error::Validation`] listing every failing field in step order.
pub fn validate(draft: &TripDraft) -> Result<()> {
    check_draft(draft).map(|_| ())
}

/// Creates a trip from `draft` and generates its itinerary.
///
/// # Errors
/// * [`Error::Validation`] when the draft is incomplete; nothing is stored
/// * any store error from creation or generation
#[instrument(skip(store, draft), fields(name = %draft.name))]
pub async fn plan_trip(store: &Store, draft: TripDraft) -> Result<(trip::Model, itinerary::Model)> {
    let new_trip = draft.into_new_trip()?;
    let trip = create_trip(store, new_trip).await?;
    let itinerary = generate_itinerary(store, &trip).await?;

    info!(
        trip_id = trip.id,
        itinerary_id = itinerary.id,
        "Trip planned"
    );
    Ok((trip, itinerary))
}

/// Overwrites a trip's wizard fields from `draft`. The itinerary is not regenerated.
///
/// # Errors
/// * [`Error::Validation`] when the draft is incomplete; nothing is stored
/// * [`Error::NotFound`] when no trip has `trip_id`
#[instrument(skip(store, draft))]
pub async fn revise_trip(store: &Store, trip_id: i64, draft: TripDraft) -> Result<trip::Model> {
    let patch = draft.into_patch()?;
    update_trip(store, trip_id, patch).await
}
