//! Seams between the fare core and the services around it.
//!
//! Concrete adapters (Nominatim, OSRM, JSON model artifacts) implement these;
//! tests substitute their own.

use serde::{Deserialize, Serialize};

use crate::error::{GeocodeError, PredictError, RouteError};
use crate::features::FeatureVector;
use crate::polyline::Polyline;

/// A geocoded address candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Place {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    /// Location as (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// A drivable route between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: Polyline,
    /// Road distance in kilometers.
    pub distance_km: f64,
    /// Expected travel time in seconds.
    pub duration_secs: f64,
}

/// Resolves free text into address candidates.
pub trait Geocoder {
    /// Returns at most `limit` candidates, best match first.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError>;
}

/// Computes a route between two (lat, lng) points.
pub trait RouteProvider {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<Route, RouteError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        (**self).search(query, limit)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for &T {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<Route, RouteError> {
        (**self).route(from, to)
    }
}

/// A trained regression model scoring one feature row.
///
/// Implementations return the raw model output; rounding is applied by the
/// caller.
pub trait FarePredictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError>;
}

impl<F> FarePredictor for F
where
    F: Fn(&FeatureVector) -> Result<f64, PredictError> + Send + Sync,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        self(features)
    }
}
