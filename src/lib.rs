//! fare-estimator core
//!
//! Encodes ride requests for a trained fare model, prices every eligible
//! vehicle tier, and wires in geocoding and routing services for the
//! end-to-end estimate.

pub mod error;
pub mod ride;
pub mod features;
pub mod traits;
pub mod model;
pub mod fare;
pub mod haversine;
pub mod polyline;
pub mod nominatim;
pub mod osrm;
pub mod estimator;
pub mod map;
pub mod render;

pub use error::{EstimateError, InvalidInput, PredictError};
pub use fare::{FareContext, FareResult, compute_fare_lookup, compute_fare_lookups};
pub use features::{FeatureVector, encode_features};
pub use ride::{RideRequest, TimeOfDay, VehicleTier};
