//! The frozen model artifact.
//!
//! Every statistic the pipeline needs at inference time ships in one
//! versioned JSON document exported by the training pipeline: imputation
//! medians, the ratio cap, the standard scaler, both base-learner
//! ensembles, and the logistic meta-classifier. Loading is fail-closed:
//! any structural or range violation rejects the artifact. Retraining
//! replaces the artifact, never the service.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::FEATURE_NAMES;

use super::ModelError;

/// Artifact schema version this build understands.
const SUPPORTED_VERSION: u32 = 1;

/// Exported artifact embedded at build time; the production default.
const BUILTIN_ARTIFACT_JSON: &str = include_str!("../../models/risk_artifact.json");

/// Column medians computed over non-zero training rows, frozen at training
/// time. Applied wherever a request carries a sentinel zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImputationMedians {
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    pub bmi: f64,
}

impl ImputationMedians {
    fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in [
            ("glucose", self.glucose),
            ("blood_pressure", self.blood_pressure),
            ("skin_thickness", self.skin_thickness),
            ("insulin", self.insulin),
            ("bmi", self.bmi),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::Artifact(format!(
                    "imputation median for {name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One exported tree in flat parallel-array form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParams {
    /// Split feature index per node; negative marks a leaf
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<u32>,
    pub right: Vec<u32>,
    /// Leaf payload: class-1 fraction (bagged) or logit step (boosted)
    pub value: Vec<f64>,
}

/// Bagged-tree ensemble parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggedParams {
    pub trees: Vec<TreeParams>,
}

/// Boosted-tree ensemble parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedParams {
    /// Prior logit the boosted trees correct from
    pub base_score: f64,
    pub trees: Vec<TreeParams>,
}

/// Logistic meta-classifier over the two base-learner probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaParams {
    /// One weight per base learner: [bagged, boosted]
    pub weights: Vec<f64>,
    pub intercept: f64,
}

/// The complete frozen artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskArtifact {
    pub version: u32,
    pub feature_names: Vec<String>,
    pub imputation_medians: ImputationMedians,
    /// Frozen 95th percentile of the training glucose/insulin ratio
    pub ratio_cap: f64,
    pub scaler_mean: Vec<f64>,
    /// Per-feature standard deviation of the frozen scaler
    pub scaler_scale: Vec<f64>,
    pub bagged: BaggedParams,
    pub boosted: BoostedParams,
    pub meta: MetaParams,

    /// sha256 of the source JSON, for log correlation (not part of the
    /// exported document)
    #[serde(skip)]
    fingerprint: String,
}

impl RiskArtifact {
    /// Parse and validate an exported artifact document.
    ///
    /// # Errors
    /// Returns `ModelError::Artifact` on any structural or range violation.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let mut artifact: Self = serde_json::from_str(json)
            .map_err(|e| ModelError::Artifact(format!("invalid artifact JSON: {e}")))?;
        artifact.fingerprint = fingerprint_hex(json.as_bytes());
        artifact.validate()?;

        tracing::info!(
            "Loaded risk artifact v{} (fingerprint {}, {} bagged + {} boosted trees)",
            artifact.version,
            artifact.fingerprint,
            artifact.bagged.trees.len(),
            artifact.boosted.trees.len(),
        );

        Ok(artifact)
    }

    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    /// Returns `ModelError::Artifact` if the file is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ModelError::Artifact(format!("failed to read {path:?}: {e}")))?;
        Self::from_json_str(&json)
    }

    /// The artifact compiled into this build.
    ///
    /// # Errors
    /// Returns `ModelError::Artifact` if the embedded document is corrupt.
    pub fn builtin() -> Result<Self, ModelError> {
        Self::from_json_str(BUILTIN_ARTIFACT_JSON)
    }

    /// Short sha256 fingerprint of the source document.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Number of model-input features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.version != SUPPORTED_VERSION {
            return Err(ModelError::Artifact(format!(
                "unsupported artifact version {} (expected {SUPPORTED_VERSION})",
                self.version
            )));
        }

        let n = self.feature_names.len();
        if n != FEATURE_NAMES.len() {
            return Err(ModelError::Artifact(format!(
                "expected {} feature names, got {n}",
                FEATURE_NAMES.len()
            )));
        }
        if self.scaler_mean.len() != n || self.scaler_scale.len() != n {
            return Err(ModelError::Artifact(
                "scaler parameter lengths do not match feature_names length".into(),
            ));
        }
        if self.scaler_mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::Artifact("non-finite scaler mean".into()));
        }
        if self.scaler_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ModelError::Artifact(
                "scaler scale entries must be positive and finite".into(),
            ));
        }

        self.imputation_medians.validate()?;

        if !self.ratio_cap.is_finite() || self.ratio_cap <= 0.0 {
            return Err(ModelError::Artifact(format!(
                "ratio_cap must be positive and finite, got {}",
                self.ratio_cap
            )));
        }

        if self.bagged.trees.is_empty() || self.boosted.trees.is_empty() {
            return Err(ModelError::Artifact("both base ensembles need trees".into()));
        }
        if !self.boosted.base_score.is_finite() {
            return Err(ModelError::Artifact("non-finite boosted base_score".into()));
        }

        if self.meta.weights.len() != 2 {
            return Err(ModelError::Artifact(format!(
                "meta-classifier expects 2 weights, got {}",
                self.meta.weights.len()
            )));
        }
        if self.meta.weights.iter().any(|w| !w.is_finite()) || !self.meta.intercept.is_finite() {
            return Err(ModelError::Artifact(
                "meta-classifier parameters must be finite".into(),
            ));
        }

        Ok(())
    }
}

fn fingerprint_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}
