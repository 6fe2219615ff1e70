//! Real Las Vegas landmarks for pickup/dropoff fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Routable with OSRM Nevada data.

use fare_estimator::traits::Place;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Landmark {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn place(&self) -> Place {
        Place::new(self.lat, self.lng, format!("{}, Las Vegas, Nevada", self.name))
    }
}

pub const WYNN: Landmark = Landmark::new("Wynn Las Vegas", 36.1263781, -115.1658180);
pub const MGM_GRAND: Landmark = Landmark::new("MGM Grand", 36.1023654, -115.1688720);
pub const BELLAGIO: Landmark = Landmark::new("Bellagio", 36.1126, -115.1767);
pub const CAESARS: Landmark = Landmark::new("Caesars Palace", 36.1162, -115.1745);
pub const GREEN_VALLEY_RANCH: Landmark = Landmark::new("Green Valley Ranch Area", 36.0308, -115.0825);
