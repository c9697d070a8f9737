//! The stacked inference pipeline.
//!
//! Feature derivation, standardization, both base learners, and the
//! logistic meta-classifier, all driven by the frozen artifact. The scaler
//! applied here is the exact scaler fitted during training; it is never
//! re-fitted from request data.

use crate::domain::{bmi_category, ClinicalRecord, FeatureVector, RiskResult};

use super::artifact::RiskArtifact;
use super::forest::{bagged_probability, boosted_probability, sigmoid, DecisionTree};
use super::ModelError;

/// Denominator guard for the glucose/insulin ratio.
const RATIO_EPSILON: f64 = 1e-6;

/// Trained two-stage ensemble plus the deterministic feature deriver.
pub struct RiskPipeline {
    artifact: RiskArtifact,
    bagged: Vec<DecisionTree>,
    boosted: Vec<DecisionTree>,
}

impl RiskPipeline {
    /// Compile a validated artifact into an evaluable pipeline.
    ///
    /// # Errors
    /// Returns `ModelError::Artifact` if any exported tree is structurally
    /// invalid.
    pub fn new(artifact: RiskArtifact) -> Result<Self, ModelError> {
        let n = artifact.n_features();

        // Bagged leaves are class fractions; boosted leaves are logit steps.
        let bagged = artifact
            .bagged
            .trees
            .iter()
            .map(|params| DecisionTree::from_params(params, n, Some((0.0, 1.0))))
            .collect::<Result<Vec<_>, _>>()?;
        let boosted = artifact
            .boosted
            .trees
            .iter()
            .map(|params| DecisionTree::from_params(params, n, None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            artifact,
            bagged,
            boosted,
        })
    }

    /// Build the pipeline from the artifact compiled into this build.
    ///
    /// # Errors
    /// Returns `ModelError::Artifact` if the embedded artifact is corrupt.
    pub fn builtin() -> Result<Self, ModelError> {
        Self::new(RiskArtifact::builtin()?)
    }

    /// The artifact backing this pipeline.
    #[must_use]
    pub fn artifact(&self) -> &RiskArtifact {
        &self.artifact
    }

    /// Run the full pipeline: derive features, standardize, predict.
    ///
    /// # Errors
    /// Returns `ModelError` if any stage produces a non-finite value.
    /// There is no fallback: a wrong risk tier is worse than an error.
    pub fn assess(&self, record: &ClinicalRecord) -> Result<RiskResult, ModelError> {
        let features = self.derive_features(record);
        let scaled = self.standardize(&features.to_vec())?;

        let p_bagged = bagged_probability(&self.bagged, &scaled);
        let p_boosted =
            boosted_probability(&self.boosted, self.artifact.boosted.base_score, &scaled);

        let meta = &self.artifact.meta;
        let logit = meta.weights[0] * p_bagged + meta.weights[1] * p_boosted + meta.intercept;
        let probability = sigmoid(logit);

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::Prediction(format!(
                "meta-classifier produced unusable probability {probability}"
            )));
        }

        tracing::debug!(
            "Assessment: p_bagged={:.4}, p_boosted={:.4}, probability={:.4}",
            p_bagged,
            p_boosted,
            probability
        );

        Ok(RiskResult::new(probability))
    }

    /// Deterministic transform from raw clinical fields to the model input.
    ///
    /// Sentinel zeros in glucose, blood pressure, skin thickness, insulin,
    /// and BMI are replaced with the frozen training medians before any
    /// derived value is computed. The glucose/insulin ratio is capped at
    /// the frozen 95th-percentile value.
    #[must_use]
    pub fn derive_features(&self, record: &ClinicalRecord) -> FeatureVector {
        let medians = &self.artifact.imputation_medians;

        let impute = |value: f64, median: f64| if value == 0.0 { median } else { value };

        let glucose = impute(record.glucose, medians.glucose);
        let blood_pressure = impute(record.blood_pressure, medians.blood_pressure);
        let skin_thickness = impute(record.skin_thickness, medians.skin_thickness);
        let insulin = impute(record.insulin, medians.insulin);
        let bmi = impute(record.bmi, medians.bmi);

        let ratio = (glucose / (insulin + RATIO_EPSILON)).min(self.artifact.ratio_cap);

        FeatureVector {
            pregnancies: record.pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            bmi,
            diabetes_pedigree: record.diabetes_pedigree,
            age: record.age,
            glucose_insulin_ratio: ratio,
            bmi_category: bmi_category(bmi),
        }
    }

    /// Apply the frozen standard scaler (zero mean, unit variance per the
    /// training fit) to a raw feature vector.
    fn standardize(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        if raw.len() != self.artifact.n_features() {
            return Err(ModelError::FeatureDerivation(format!(
                "feature count mismatch: got {}, expected {}",
                raw.len(),
                self.artifact.n_features()
            )));
        }

        let mut scaled = Vec::with_capacity(raw.len());
        for (i, &value) in raw.iter().enumerate() {
            let z = (value - self.artifact.scaler_mean[i]) / self.artifact.scaler_scale[i];
            if !z.is_finite() {
                return Err(ModelError::FeatureDerivation(format!(
                    "standardization produced non-finite value for feature {i}"
                )));
            }
            scaled.push(z);
        }
        Ok(scaled)
    }
}
