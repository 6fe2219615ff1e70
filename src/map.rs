//! Route map as a GeoJSON document.
//!
//! Pickup and dropoff markers plus the route line, with styling hints in
//! feature properties. Any GeoJSON-capable map viewer can render it.

use serde_json::{Value, json};

use crate::estimator::Estimate;
use crate::polyline::Polyline;
use crate::traits::Place;

const DEFAULT_ZOOM: u8 = 13;
const PICKUP_COLOR: &str = "green";
const DROPOFF_COLOR: &str = "red";
const ROUTE_COLOR: &str = "black";
const ROUTE_WEIGHT: f64 = 2.5;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteMap {
    pub pickup: Place,
    pub dropoff: Place,
    pub route: Polyline,
    /// (lat, lng) the view is centered on.
    pub center: (f64, f64),
    pub zoom: u8,
}

impl RouteMap {
    pub fn new(pickup: Place, dropoff: Place, route: Polyline) -> Self {
        let center = ((pickup.lat + dropoff.lat) / 2.0, (pickup.lng + dropoff.lng) / 2.0);
        Self {
            pickup,
            dropoff,
            route,
            center,
            zoom: DEFAULT_ZOOM,
        }
    }

    pub fn from_estimate(estimate: &Estimate) -> Self {
        Self::new(
            estimate.pickup.clone(),
            estimate.dropoff.clone(),
            estimate.route.geometry.clone(),
        )
    }

    /// Markers always; the route line only when there is geometry to draw.
    pub fn to_geojson(&self) -> Value {
        let mut features = vec![
            marker(&self.pickup, "Pickup Location", PICKUP_COLOR),
            marker(&self.dropoff, "Dropoff Location", DROPOFF_COLOR),
        ];
        if !self.route.is_empty() {
            features.push(json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": self.route.to_lng_lat(),
                },
                "properties": {
                    "stroke": ROUTE_COLOR,
                    "stroke-width": ROUTE_WEIGHT,
                    "length_km": self.route.length_km(),
                },
            }));
        }

        json!({
            "type": "FeatureCollection",
            "properties": {
                "center": [self.center.1, self.center.0],
                "zoom": self.zoom,
            },
            "features": features,
        })
    }
}

fn marker(place: &Place, popup: &str, color: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [place.lng, place.lat],
        },
        "properties": {
            "popup": popup,
            "address": place.address,
            "marker-color": color,
        },
    })
}
