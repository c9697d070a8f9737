//! Model layer: the frozen training artifact and the inference pipeline.
//!
//! The artifact carries every statistic fixed at training time (imputation
//! medians, the ratio cap, the scaler, both base ensembles, and the logistic
//! meta-classifier). Nothing in this layer recomputes a statistic from
//! request data.

mod artifact;
mod forest;
mod pipeline;

pub use artifact::{
    BaggedParams, BoostedParams, ImputationMedians, MetaParams, RiskArtifact, TreeParams,
};
pub use pipeline::RiskPipeline;

/// Error type for the risk pipeline.
///
/// There is no silent fallback anywhere in this layer: a wrong risk tier is
/// worse than an error.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact rejected: {0}")]
    Artifact(String),

    #[error("Feature derivation failed: {0}")]
    FeatureDerivation(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),
}
