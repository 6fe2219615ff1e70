//! Fare lookup: price every eligible tier of a ride request.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::PredictError;
use crate::features::{FeatureVector, encode_request};
use crate::model::{ModelArtifact, ModelConfig};
use crate::ride::{RideRequest, VehicleTier};
use crate::traits::FarePredictor;

/// The loaded model plus pricing options.
///
/// Build once at startup and pass to every lookup.
#[derive(Clone)]
pub struct FareContext {
    model: ModelHandle,
    clamp_negative: bool,
}

#[derive(Clone)]
enum ModelHandle {
    Ready(Arc<dyn FarePredictor>),
    /// Loading failed; every tier reports this error.
    Failed(PredictError),
}

impl FareContext {
    pub fn new(predictor: impl FarePredictor + 'static) -> Self {
        Self {
            model: ModelHandle::Ready(Arc::new(predictor)),
            clamp_negative: false,
        }
    }

    /// Loads the artifact named by `config`.
    ///
    /// A missing or unreadable artifact does not fail here; it is reported
    /// against each tier at lookup time.
    pub fn load(config: &ModelConfig) -> Self {
        let model = match ModelArtifact::load(&config.artifact_path) {
            Ok(artifact) => {
                tracing::info!(path = %config.artifact_path.display(), "loaded fare model");
                ModelHandle::Ready(Arc::new(artifact))
            }
            Err(err) => {
                let err = err.into_predict_error();
                tracing::warn!(path = %config.artifact_path.display(), error = %err, "fare model unavailable");
                ModelHandle::Failed(err)
            }
        };

        Self {
            model,
            clamp_negative: config.clamp_negative,
        }
    }

    pub fn with_clamp_negative(mut self, clamp_negative: bool) -> Self {
        self.clamp_negative = clamp_negative;
        self
    }

    pub fn is_model_ready(&self) -> bool {
        matches!(self.model, ModelHandle::Ready(_))
    }

    /// Scores one feature row and rounds to cents.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        let predictor = match &self.model {
            ModelHandle::Ready(predictor) => predictor,
            ModelHandle::Failed(err) => return Err(err.clone()),
        };

        let raw = predictor.predict(features)?;
        let mut fare = round_cents(raw);
        // Outputs near f64::MAX overflow while scaling to cents.
        if !fare.is_finite() {
            return Err(PredictError::InferenceFailure(format!(
                "model returned a non-finite fare ({})",
                raw
            )));
        }
        if fare < 0.0 {
            tracing::warn!(fare, clamped = self.clamp_negative, "model predicted a negative fare");
            if self.clamp_negative {
                fare = 0.0;
            }
        }
        Ok(fare)
    }
}

/// Rounds to cents, halves going to the even cent.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Outcome of pricing one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierFare {
    pub tier: VehicleTier,
    pub fare: Result<f64, PredictError>,
}

/// Per-tier fares for one request, in presentation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareResult {
    entries: Vec<TierFare>,
    suggested: VehicleTier,
}

impl FareResult {
    /// The tier that best fits the party size.
    pub fn suggested(&self) -> VehicleTier {
        self.suggested
    }

    pub fn entries(&self) -> &[TierFare] {
        &self.entries
    }

    pub fn tiers(&self) -> impl Iterator<Item = VehicleTier> + '_ {
        self.entries.iter().map(|entry| entry.tier)
    }

    /// The fare for `tier`, if it was priced successfully.
    pub fn fare(&self, tier: VehicleTier) -> Option<f64> {
        self.outcome(tier).and_then(|outcome| outcome.as_ref().ok().copied())
    }

    /// `None` when the tier was not eligible for this request.
    pub fn outcome(&self, tier: VehicleTier) -> Option<&Result<f64, PredictError>> {
        self.entries
            .iter()
            .find(|entry| entry.tier == tier)
            .map(|entry| &entry.fare)
    }

    pub fn errors(&self) -> impl Iterator<Item = (VehicleTier, &PredictError)> + '_ {
        self.entries
            .iter()
            .filter_map(|entry| entry.fare.as_ref().err().map(|err| (entry.tier, err)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Prices every tier eligible for `request`.
///
/// A failing tier is recorded and does not stop the others.
pub fn compute_fare_lookup(context: &FareContext, request: &RideRequest) -> FareResult {
    let entries = request
        .eligible_tiers()
        .iter()
        .map(|&tier| {
            let features = encode_request(request, tier);
            let fare = context.predict(&features);
            match &fare {
                Ok(amount) => tracing::debug!(%tier, amount, "priced tier"),
                Err(err) => tracing::warn!(%tier, error = %err, "could not price tier"),
            }
            TierFare { tier, fare }
        })
        .collect();

    FareResult {
        entries,
        suggested: VehicleTier::suggested(request.passenger_count()),
    }
}

/// Prices independent requests in parallel against one shared model.
///
/// Results are returned in input order.
pub fn compute_fare_lookups(context: &FareContext, requests: &[RideRequest]) -> Vec<FareResult> {
    requests
        .par_iter()
        .map(|request| compute_fare_lookup(context, request))
        .collect()
}
