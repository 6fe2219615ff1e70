//! End-to-end estimate tests with scripted geocoding and routing.

mod fixtures;

use chrono::{NaiveDate, NaiveTime};

use fare_estimator::error::{EstimateError, InvalidInput, PredictError};
use fare_estimator::estimator::{DistanceSource, Estimator, EstimatorConfig, TripRequest};
use fare_estimator::fare::FareContext;
use fare_estimator::features::FeatureVector;
use fare_estimator::haversine::{StraightLineRouter, haversine_km};
use fare_estimator::map::RouteMap;
use fare_estimator::render::{render_fare_cards, render_trip_summary};
use fare_estimator::ride::VehicleTier;
use fare_estimator::traits::RouteProvider;

use fixtures::landmarks::{BELLAGIO, CAESARS, GREEN_VALLEY_RANCH, MGM_GRAND, WYNN};
use fixtures::{FixedRouter, ScriptedGeocoder, UnreachableRouter};

/// Fare = distance in km, so the priced distance is visible in the result.
fn distance_priced() -> FareContext {
    FareContext::new(|features: &FeatureVector| -> Result<f64, PredictError> { Ok(features.distance_km) })
}

fn geocoder() -> ScriptedGeocoder {
    ScriptedGeocoder::new()
        .answer("wynn", vec![WYNN.place()])
        .answer("mgm", vec![MGM_GRAND.place()])
        .answer("strip", vec![BELLAGIO.place(), CAESARS.place(), WYNN.place(), MGM_GRAND.place()])
}

fn estimator<R: RouteProvider>(router: R, source: DistanceSource) -> Estimator<ScriptedGeocoder, R> {
    Estimator::new(
        geocoder(),
        router,
        distance_priced(),
        EstimatorConfig {
            suggestion_limit: 3,
            distance_source: source,
        },
    )
}

fn trip(passenger_count: u32) -> TripRequest {
    TripRequest {
        pickup: WYNN.place(),
        dropoff: MGM_GRAND.place(),
        pickup_date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
        pickup_time: NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
        passenger_count,
    }
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[test]
fn suggestions_respect_limit() {
    let estimator = estimator(FixedRouter::new(1.0), DistanceSource::Geodesic);
    let places = estimator.suggestions("strip").unwrap();

    assert_eq!(places.len(), 3);
    assert_eq!(places[0], BELLAGIO.place());
}

#[test]
fn resolve_picks_requested_candidate() {
    let estimator = estimator(FixedRouter::new(1.0), DistanceSource::Geodesic);

    assert_eq!(estimator.resolve("pickup", "strip", 1).unwrap(), CAESARS.place());
    assert!(matches!(
        estimator.resolve("pickup", "strip", 3),
        Err(EstimateError::CandidateOutOfRange { index: 3, available: 3, .. })
    ));
    assert!(matches!(
        estimator.resolve("dropoff", "atlantis", 0),
        Err(EstimateError::NoCandidate { .. })
    ));
}

#[test]
fn geodesic_distance_prices_by_default() {
    let estimator = estimator(FixedRouter::new(4.2), DistanceSource::Geodesic);
    let estimate = estimator.estimate(&trip(2)).unwrap();

    let geodesic = haversine_km(WYNN.coords(), MGM_GRAND.coords());
    assert!((estimate.distance_km - geodesic).abs() < 1e-9);
    assert_eq!(estimate.route.distance_km, 4.2);
    assert_eq!(estimate.fares.len(), 3);
    assert_eq!(estimate.fares.fare(VehicleTier::Mini), Some(cents(geodesic)));
}

#[test]
fn road_distance_prices_when_configured() {
    let estimator = estimator(FixedRouter::new(4.2), DistanceSource::Road);
    let estimate = estimator.estimate(&trip(5)).unwrap();

    assert_eq!(estimate.distance_km, 4.2);
    assert_eq!(estimate.fares.tiers().collect::<Vec<_>>(), vec![VehicleTier::PremiumXuv]);
    assert_eq!(estimate.fares.fare(VehicleTier::PremiumXuv), Some(4.2));
}

#[test]
fn routing_failure_aborts_without_fares() {
    let estimator = estimator(UnreachableRouter, DistanceSource::Geodesic);
    let err = estimator.estimate(&trip(1)).unwrap_err();

    assert!(matches!(err, EstimateError::Route(_)));
    assert!(err.to_string().starts_with("failed to fetch route"));
}

#[test]
fn invalid_passenger_count_is_rejected_before_routing() {
    let router = FixedRouter::new(1.0);
    let estimator = Estimator::new(geocoder(), &router, distance_priced(), EstimatorConfig::default());

    let err = estimator.estimate(&trip(7)).unwrap_err();
    assert!(matches!(err, EstimateError::InvalidInput(InvalidInput::PassengerCount(7))));
    assert_eq!(router.calls.get(), 0);
}

#[test]
fn model_failure_still_returns_route_and_map() {
    let dir = tempfile::tempdir().unwrap();
    let fares = FareContext::load(&fare_estimator::model::ModelConfig {
        artifact_path: dir.path().join("UBER_model.json"),
        clamp_negative: false,
    });
    let estimator = Estimator::new(
        geocoder(),
        StraightLineRouter::default(),
        fares,
        EstimatorConfig::default(),
    );

    let estimate = estimator.estimate(&trip(3)).unwrap();
    assert_eq!(estimate.fares.errors().count(), 3);
    assert_eq!(estimate.route.geometry.points().len(), 2);

    let cards = render_fare_cards(&estimate.fares);
    assert_eq!(cards.matches("model file not found").count(), 3);

    let map = RouteMap::from_estimate(&estimate).to_geojson();
    assert_eq!(map["features"].as_array().unwrap().len(), 3);
}

#[test]
fn summary_reports_priced_distance() {
    let estimator = estimator(FixedRouter::new(30.0), DistanceSource::Geodesic);
    let trip = TripRequest {
        dropoff: GREEN_VALLEY_RANCH.place(),
        ..trip(1)
    };
    let estimate = estimator.estimate(&trip).unwrap();
    let summary = render_trip_summary(&estimate);

    assert!(summary.contains("Pickup: Wynn Las Vegas"));
    assert!(summary.contains("Dropoff: Green Valley Ranch Area"));
    assert!(summary.contains(&format!("Distance: {:.2} km", estimate.distance_km)));
}
