//! Unified error type for the trip planning core.

use std::fmt;
use thiserror::Error;

/// A single failed field check from the trip wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the wizard field that failed
    pub field: &'static str,
    /// Human-readable explanation shown next to the field
    pub message: String,
}

impl FieldError {
    /// Builds a field error from a field name and message.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors returned by store, repository, and wizard operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings or fixture loading failed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Update or delete referenced a record that does not exist
    #[error("{entity} not found (id {id})")]
    NotFound {
        /// Kind of record, e.g. "Trip"
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// Wizard input rejected before reaching any repository
    #[error("Validation failed: {}", join_field_errors(.errors))]
    Validation {
        /// Every failing field, in step order
        errors: Vec<FieldError>,
    },

    /// Activating a trip while another one is already active
    #[error("Trip {active_id} is already active; cannot activate trip {requested_id}")]
    ActiveTripConflict {
        /// The trip currently holding the active status
        active_id: i64,
        /// The trip the caller tried to activate
        requested_id: i64,
    },

    /// The store's random source lock was poisoned
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error while reading fixture files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`].
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
