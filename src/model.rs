//! JSON model artifacts for the fare regressor.
//!
//! An artifact is loaded once and shared across requests. Two model families
//! are supported: a linear model and an ensemble of binary regression trees
//! (the shape scikit-learn forests and boosted trees export to).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
use crate::traits::FarePredictor;

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
    /// Clamp negative predictions to zero instead of passing them through.
    pub clamp_negative: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("UBER_model.json"),
            clamp_negative: false,
        }
    }
}

/// Serialized model, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug)]
pub enum ModelLoadError {
    Missing(PathBuf),
    Io(io::Error),
    Malformed(String),
}

impl From<io::Error> for ModelLoadError {
    fn from(err: io::Error) -> Self {
        ModelLoadError::Io(err)
    }
}

impl From<serde_json::Error> for ModelLoadError {
    fn from(err: serde_json::Error) -> Self {
        ModelLoadError::Malformed(err.to_string())
    }
}

impl ModelLoadError {
    /// The error every tier reports when the model could not be loaded.
    pub fn into_predict_error(self) -> PredictError {
        match self {
            ModelLoadError::Missing(path) => PredictError::ModelUnavailable {
                path: path.display().to_string(),
            },
            ModelLoadError::Io(err) => {
                PredictError::InferenceFailure(format!("could not read model artifact: {}", err))
            }
            ModelLoadError::Malformed(reason) => {
                PredictError::InferenceFailure(format!("invalid model artifact: {}", reason))
            }
        }
    }
}

impl ModelArtifact {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ModelLoadError::Missing(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), ModelLoadError> {
        match self {
            ModelArtifact::Linear(model) => {
                check_feature_names(model.feature_names.as_deref())?;
                if model.coefficients.len() != FEATURE_COUNT {
                    return Err(ModelLoadError::Malformed(format!(
                        "expected {} coefficients, found {}",
                        FEATURE_COUNT,
                        model.coefficients.len()
                    )));
                }
                Ok(())
            }
            ModelArtifact::TreeEnsemble(model) => {
                check_feature_names(model.feature_names.as_deref())?;
                if model.trees.is_empty() {
                    return Err(ModelLoadError::Malformed("tree ensemble has no trees".to_string()));
                }
                for (index, tree) in model.trees.iter().enumerate() {
                    tree.validate()
                        .map_err(|reason| ModelLoadError::Malformed(format!("tree {}: {}", index, reason)))?;
                }
                Ok(())
            }
        }
    }
}

impl FarePredictor for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        match self {
            ModelArtifact::Linear(model) => model.predict(features),
            ModelArtifact::TreeEnsemble(model) => model.predict(features),
        }
    }
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), ModelLoadError> {
    let Some(names) = names else {
        return Ok(());
    };
    if names.len() != FEATURE_COUNT || names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
        return Err(ModelLoadError::Malformed(format!(
            "model expects features {:?}, encoder produces {:?}",
            names, FEATURE_NAMES
        )));
    }
    Ok(())
}

/// `intercept + sum(coefficients[i] * x[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl FarePredictor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(PredictError::InferenceFailure(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        let row = features.to_array();
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(weight, value)| weight * value)
                .sum::<f64>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random-forest style average of tree outputs.
    #[default]
    Mean,
    /// Boosting style sum of tree outputs.
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl FarePredictor for TreeEnsemble {
    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictError> {
        if self.trees.is_empty() {
            return Err(PredictError::InferenceFailure("tree ensemble has no trees".to_string()));
        }
        let row = features.to_array();
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(&row)?;
        }
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total,
        };
        Ok(self.base_score + combined)
    }
}

/// Flat node table; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Samples with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

impl RegressionTree {
    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature, left, right, ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {} splits on unknown feature {}", index, feature));
                }
                for child in [*left, *right] {
                    if child >= self.nodes.len() {
                        return Err(format!("node {} points at missing node {}", index, child));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &[f64; FEATURE_COUNT]) -> Result<f64, PredictError> {
        let mut index = 0;
        // A well-formed tree never visits more nodes than it has.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or_else(|| {
                        PredictError::InferenceFailure(format!("unknown feature index {}", feature))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictError::InferenceFailure(format!(
                        "tree references missing node {}",
                        index
                    )));
                }
            }
        }
        Err(PredictError::InferenceFailure("tree contains a cycle".to_string()))
    }
}
