//! Plain-text presentation of an estimate.

use std::fmt::Write;

use crate::estimator::Estimate;
use crate::fare::FareResult;
use crate::traits::Place;

/// One card per priced tier: name, tagline and fare (or why it is missing).
///
/// The tier suited to the party size is marked.
pub fn render_fare_cards(fares: &FareResult) -> String {
    let mut out = String::new();
    for entry in fares.entries() {
        let price = match &entry.fare {
            Ok(amount) => format_fare(*amount),
            Err(err) => format!("unavailable ({})", err),
        };
        let marker = if entry.tier == fares.suggested() { " *" } else { "" };
        let _ = writeln!(out, "{:<14}{:>12}{}", entry.tier.display_name(), price, marker);
        let _ = writeln!(out, "  {}", entry.tier.tagline());
    }
    out
}

pub fn render_trip_summary(estimate: &Estimate) -> String {
    format!(
        "Pickup: {}\nDropoff: {}\nDistance: {:.2} km\n",
        describe(&estimate.pickup),
        describe(&estimate.dropoff),
        estimate.distance_km
    )
}

/// `$12.50`; negative fares keep their sign after the currency symbol.
pub fn format_fare(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn describe(place: &Place) -> String {
    format!("{} ({:.6},{:.6})", place.address, place.lat, place.lng)
}
