//! Error types for request validation, pricing and the external services.

use serde::Serialize;
use thiserror::Error;

/// A ride request that cannot be priced as given.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("passenger count must be between 1 and 6, got {0}")]
    PassengerCount(u32),
    #[error("distance must be a non-negative number of kilometers, got {0}")]
    Distance(f64),
    #[error("pickup date must look like YYYY-MM-DD, got {0:?}")]
    Date(String),
    #[error("pickup time must look like HH:MM, got {0:?}")]
    Time(String),
}

/// Why a single tier has no fare.
///
/// Cloneable so one model failure can be reported against every tier.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PredictError {
    #[error("model file not found at {path}; make sure the model artifact is present")]
    ModelUnavailable { path: String },
    #[error("error predicting fare: {0}")]
    InferenceFailure(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned an unusable candidate: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service answered {code}: {message}")]
    Service { code: String, message: String },
    #[error("routing service returned no route")]
    NoRoute,
}

/// Failures that stop an end-to-end estimate.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error("failed to fetch route: {0}")]
    Route(#[from] RouteError),
    #[error("no suggestions found for {label} {query:?}")]
    NoCandidate { label: String, query: String },
    #[error("{label} suggestion {index} is out of range ({available} available)")]
    CandidateOutOfRange {
        label: String,
        index: usize,
        available: usize,
    },
}
