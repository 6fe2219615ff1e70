//! Feature encoding for the fare model.
//!
//! Field order and the categorical codes are fixed by the model's training
//! schema. Changing either requires retraining the model.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::ride::{RideRequest, TimeOfDay, VehicleTier};

/// Number of features the model consumes.
pub const FEATURE_COUNT: usize = 11;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "passenger_count",
    "year",
    "month",
    "day",
    "day_of_week",
    "week_of_year",
    "hour",
    "minute",
    "time_of_day",
    "vehicle_type",
    "distance_km",
];

/// One model input row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub passenger_count: u32,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    /// ISO 8601 week number.
    pub week_of_year: u32,
    pub hour: u32,
    pub minute: u32,
    pub time_of_day: u32,
    pub vehicle_type: u32,
    pub distance_km: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.passenger_count),
            f64::from(self.year),
            f64::from(self.month),
            f64::from(self.day),
            f64::from(self.day_of_week),
            f64::from(self.week_of_year),
            f64::from(self.hour),
            f64::from(self.minute),
            f64::from(self.time_of_day),
            f64::from(self.vehicle_type),
            self.distance_km,
        ]
    }
}

/// Encodes raw ride attributes for one tier.
pub fn encode_features(
    passenger_count: u32,
    pickup_date: NaiveDate,
    pickup_time: NaiveTime,
    distance_km: f64,
    tier: VehicleTier,
) -> FeatureVector {
    let hour = pickup_time.hour();

    FeatureVector {
        passenger_count,
        year: pickup_date.year(),
        month: pickup_date.month(),
        day: pickup_date.day(),
        day_of_week: pickup_date.weekday().num_days_from_monday(),
        week_of_year: pickup_date.iso_week().week(),
        hour,
        minute: pickup_time.minute(),
        time_of_day: TimeOfDay::from_hour(hour).code(),
        vehicle_type: tier.code(),
        distance_km,
    }
}

/// Encodes a validated request for one tier.
pub fn encode_request(request: &RideRequest, tier: VehicleTier) -> FeatureVector {
    encode_features(
        request.passenger_count(),
        request.pickup_date(),
        request.pickup_time(),
        request.distance_km(),
        tier,
    )
}
