//! Route geometry as decoded (lat, lng) points.
//!
//! Routing services and GeoJSON speak `[lng, lat]`; the conversion happens
//! here so the rest of the crate only sees (lat, lng).

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from (lat, lng) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Creates a polyline from GeoJSON-ordered `[lng, lat]` pairs.
    pub fn from_lng_lat(coordinates: &[[f64; 2]]) -> Self {
        Self {
            points: coordinates.iter().map(|[lng, lat]| (*lat, *lng)).collect(),
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as GeoJSON `[lng, lat]` pairs.
    pub fn to_lng_lat(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|(lat, lng)| [*lng, *lat]).collect()
    }

    /// Sum of great-circle segment lengths.
    pub fn length_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_km(pair[0], pair[1]))
            .sum()
    }
}
