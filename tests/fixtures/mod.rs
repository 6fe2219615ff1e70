//! Test fixtures for fare-estimator.
//!
//! Provides:
//! - Real Las Vegas landmarks
//! - Scripted geocoder and router doubles
//! - Model artifact builders

#![allow(dead_code)]

pub mod landmarks;
pub mod osrm_dataset;

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fare_estimator::error::{GeocodeError, RouteError};
use fare_estimator::features::FEATURE_COUNT;
use fare_estimator::polyline::Polyline;
use fare_estimator::traits::{Geocoder, Place, Route, RouteProvider};

/// Answers queries from a fixed table; unknown queries have no candidates.
#[derive(Default)]
pub struct ScriptedGeocoder {
    answers: HashMap<String, Vec<Place>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, query: &str, places: Vec<Place>) -> Self {
        self.answers.insert(query.to_string(), places);
        self
    }
}

impl Geocoder for ScriptedGeocoder {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        Ok(self
            .answers
            .get(query)
            .map(|places| places.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

/// Returns a two-point route with a fixed road distance and counts calls.
pub struct FixedRouter {
    pub road_km: f64,
    pub calls: Cell<usize>,
}

impl FixedRouter {
    pub fn new(road_km: f64) -> Self {
        Self {
            road_km,
            calls: Cell::new(0),
        }
    }
}

impl RouteProvider for FixedRouter {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<Route, RouteError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Route {
            geometry: Polyline::new(vec![from, to]),
            distance_km: self.road_km,
            duration_secs: self.road_km * 90.0,
        })
    }
}

/// Always fails the way OSRM does when no road connects the points.
pub struct UnreachableRouter;

impl RouteProvider for UnreachableRouter {
    fn route(&self, _from: (f64, f64), _to: (f64, f64)) -> Result<Route, RouteError> {
        Err(RouteError::Service {
            code: "NoRoute".to_string(),
            message: "Impossible route between points".to_string(),
        })
    }
}

/// Linear artifact: `intercept + per_tier * vehicle_type + per_km * distance_km`.
pub fn linear_artifact(intercept: f64, per_tier: f64, per_km: f64) -> serde_json::Value {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[9] = per_tier;
    coefficients[10] = per_km;
    serde_json::json!({
        "kind": "linear",
        "intercept": intercept,
        "coefficients": coefficients,
    })
}

/// Writes `artifact` as `model.json` inside `dir`.
pub fn write_artifact(dir: &Path, artifact: &serde_json::Value) -> PathBuf {
    let path = dir.join("model.json");
    std::fs::write(&path, artifact.to_string()).expect("write model artifact");
    path
}
