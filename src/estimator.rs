//! End-to-end estimate: geocode, route, price.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::EstimateError;
use crate::fare::{FareContext, FareResult, compute_fare_lookup};
use crate::haversine::haversine_km;
use crate::ride::RideRequest;
use crate::traits::{Geocoder, Place, Route, RouteProvider};

/// Which distance is fed to the fare model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceSource {
    /// Great-circle pickup to dropoff distance, what the model was trained on.
    #[default]
    Geodesic,
    /// Road distance reported by the router.
    Road,
}

#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub suggestion_limit: usize,
    pub distance_source: DistanceSource,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: 5,
            distance_source: DistanceSource::Geodesic,
        }
    }
}

/// Everything the user entered once addresses are resolved.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub pickup: Place,
    pub dropoff: Place,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub passenger_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub pickup: Place,
    pub dropoff: Place,
    /// Distance the fares were priced on.
    pub distance_km: f64,
    pub route: Route,
    pub fares: FareResult,
}

pub struct Estimator<G, R> {
    geocoder: G,
    router: R,
    fares: FareContext,
    config: EstimatorConfig,
}

impl<G, R> Estimator<G, R>
where
    G: Geocoder,
    R: RouteProvider,
{
    pub fn new(geocoder: G, router: R, fares: FareContext, config: EstimatorConfig) -> Self {
        Self {
            geocoder,
            router,
            fares,
            config,
        }
    }

    /// Address candidates for free text, best match first.
    pub fn suggestions(&self, query: &str) -> Result<Vec<Place>, EstimateError> {
        let places = self.geocoder.search(query, self.config.suggestion_limit)?;
        tracing::debug!(query, found = places.len(), "address suggestions");
        Ok(places)
    }

    /// Resolves `query` and picks candidate `choice`.
    pub fn resolve(&self, label: &str, query: &str, choice: usize) -> Result<Place, EstimateError> {
        let mut candidates = self.suggestions(query)?;
        if candidates.is_empty() {
            return Err(EstimateError::NoCandidate {
                label: label.to_string(),
                query: query.to_string(),
            });
        }
        if choice >= candidates.len() {
            return Err(EstimateError::CandidateOutOfRange {
                label: label.to_string(),
                index: choice,
                available: candidates.len(),
            });
        }
        Ok(candidates.swap_remove(choice))
    }

    /// Routes the trip and prices every eligible tier.
    ///
    /// A routing failure aborts the estimate; a pricing failure only affects
    /// its tier.
    pub fn estimate(&self, trip: &TripRequest) -> Result<Estimate, EstimateError> {
        let geodesic_km = haversine_km(trip.pickup.location(), trip.dropoff.location());
        // Validate before spending a routing call on a request we cannot price.
        RideRequest::new(trip.passenger_count, trip.pickup_date, trip.pickup_time, geodesic_km)?;

        let route = self
            .router
            .route(trip.pickup.location(), trip.dropoff.location())?;

        let distance_km = match self.config.distance_source {
            DistanceSource::Geodesic => geodesic_km,
            DistanceSource::Road => route.distance_km,
        };
        tracing::info!(
            pickup = %trip.pickup.address,
            dropoff = %trip.dropoff.address,
            distance_km,
            road_km = route.distance_km,
            "route found"
        );

        let request = RideRequest::new(
            trip.passenger_count,
            trip.pickup_date,
            trip.pickup_time,
            distance_km,
        )?;
        let fares = compute_fare_lookup(&self.fares, &request);

        Ok(Estimate {
            pickup: trip.pickup.clone(),
            dropoff: trip.dropoff.clone(),
            distance_km,
            route,
            fares,
        })
    }
}
