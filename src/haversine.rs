//! Great-circle distance and the straight-line route fallback.
//!
//! Pickup to dropoff pricing distance is geodesic, not road distance.
//! The fallback router uses the same math when no routing service is reachable.

use crate::error::RouteError;
use crate::polyline::Polyline;
use crate::traits::{Route, RouteProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Routes in a straight line at an assumed speed.
///
/// Less accurate than OSRM (ignores roads) but always available.
#[derive(Debug, Clone)]
pub struct StraightLineRouter {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineRouter {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineRouter {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

impl RouteProvider for StraightLineRouter {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<Route, RouteError> {
        let distance_km = haversine_km(from, to);
        Ok(Route {
            geometry: Polyline::new(vec![from, to]),
            distance_km,
            duration_secs: self.km_to_seconds(distance_km),
        })
    }
}
