//! Error and warning taxonomy of the core boundary.
//!
//! Errors fail the call and leave the caller's state untouched. Warnings are
//! data: they ride on the inference so hosts can log or display them, and the
//! core itself never logs them as failures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal observation errors.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoreError {
    /// A required input is missing.
    #[error("required input missing: {field}")]
    InsufficientInput { field: String },

    /// Relative humidity outside (0, 100].
    #[error("relative humidity {value} outside the valid range")]
    InvalidHumidity { value: f64 },

    /// A numeric input outside its physically valid range.
    #[error("{field} value {value} outside the valid range")]
    InvalidRange { field: String, value: f64 },

    /// Observation timestamp precedes the last accepted observation.
    #[error("observation at {observed} precedes last accepted observation at {last}")]
    OutOfOrderObservation {
        observed: DateTime<Utc>,
        last: DateTime<Utc>,
    },
}

impl CoreError {
    /// Shorthand for a missing required field.
    #[must_use]
    pub fn missing(field: &str) -> Self {
        CoreError::InsufficientInput {
            field: field.to_owned(),
        }
    }
}

/// Non-fatal degradations attached to an inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The configured zenith maximum radiation is outside [800, 2000] W/m²;
    /// the analyzer fell back to 1000.
    Calibration { configured_zenith_wm2: f64 },

    /// A sensor expected by an analyzer was absent or unusable; the analysis
    /// ran degraded.
    DegradedSensor { sensor: String },

    /// An externally supplied dewpoint exceeded the air temperature and was
    /// clamped to it.
    DewpointClamped { supplied_f: f64 },

    /// A trend query had too little history; the dependent analysis treated
    /// the trend as flat.
    InsufficientHistory { query: String },
}
