//! Ride request and the categorical labels the fare model was trained on.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Largest party a single booking can carry.
pub const MAX_PASSENGERS: u32 = 6;

/// Parties above this size only fit the largest tier.
const SHARED_TIER_MAX_PASSENGERS: u32 = 4;

/// Vehicle class offered for a ride.
///
/// Declaration order is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTier {
    Mini,
    Xuv,
    PremiumXuv,
}

impl VehicleTier {
    pub const ALL: [VehicleTier; 3] = [VehicleTier::Mini, VehicleTier::Xuv, VehicleTier::PremiumXuv];

    /// Code the model was trained with. Must not be renumbered.
    pub fn code(self) -> u32 {
        match self {
            VehicleTier::Mini => 0,
            VehicleTier::Xuv => 1,
            VehicleTier::PremiumXuv => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VehicleTier::Mini => "Uber Mini",
            VehicleTier::Xuv => "XUV",
            VehicleTier::PremiumXuv => "Premium XUV",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            VehicleTier::Mini => "Affordable compact rides",
            VehicleTier::Xuv => "Comfortable sedans, top-quality drivers",
            VehicleTier::PremiumXuv => "Premium SUVs with top-notch services",
        }
    }

    /// Tiers offered for a party of `passenger_count`, in presentation order.
    pub fn eligible(passenger_count: u32) -> &'static [VehicleTier] {
        if passenger_count <= SHARED_TIER_MAX_PASSENGERS {
            &Self::ALL
        } else {
            &[VehicleTier::PremiumXuv]
        }
    }

    /// The smallest tier that seats the party comfortably.
    ///
    /// Informational only; [`VehicleTier::eligible`] decides what gets priced.
    pub fn suggested(passenger_count: u32) -> VehicleTier {
        match passenger_count {
            0..=2 => VehicleTier::Mini,
            3..=4 => VehicleTier::Xuv,
            _ => VehicleTier::PremiumXuv,
        }
    }
}

impl std::fmt::Display for VehicleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VehicleTier::Mini => "mini",
            VehicleTier::Xuv => "xuv",
            VehicleTier::PremiumXuv => "premium_xuv",
        };
        f.write_str(label)
    }
}

/// Coarse segment of the day a pickup falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Segments an hour (0-23) with lower-inclusive, upper-exclusive bounds.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
            TimeOfDay::Night => 3,
        }
    }
}

/// A validated request to price one ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideRequest {
    passenger_count: u32,
    pickup_date: NaiveDate,
    pickup_time: NaiveTime,
    distance_km: f64,
}

impl RideRequest {
    pub fn new(
        passenger_count: u32,
        pickup_date: NaiveDate,
        pickup_time: NaiveTime,
        distance_km: f64,
    ) -> Result<Self, InvalidInput> {
        if !(1..=MAX_PASSENGERS).contains(&passenger_count) {
            return Err(InvalidInput::PassengerCount(passenger_count));
        }
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(InvalidInput::Distance(distance_km));
        }

        Ok(Self {
            passenger_count,
            pickup_date,
            pickup_time,
            distance_km,
        })
    }

    /// Builds a request from `YYYY-MM-DD` and `HH:MM[:SS]` strings.
    pub fn parse(
        passenger_count: u32,
        pickup_date: &str,
        pickup_time: &str,
        distance_km: f64,
    ) -> Result<Self, InvalidInput> {
        let date = parse_date(pickup_date)?;
        let time = parse_time(pickup_time)?;
        Self::new(passenger_count, date, time, distance_km)
    }

    pub fn passenger_count(&self) -> u32 {
        self.passenger_count
    }

    pub fn pickup_date(&self) -> NaiveDate {
        self.pickup_date
    }

    pub fn pickup_time(&self) -> NaiveTime {
        self.pickup_time
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn eligible_tiers(&self) -> &'static [VehicleTier] {
        VehicleTier::eligible(self.passenger_count)
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, InvalidInput> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| InvalidInput::Date(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, InvalidInput> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S"))
        .map_err(|_| InvalidInput::Time(value.to_string()))
}
