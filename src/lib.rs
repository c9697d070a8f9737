//! # GlucoGuard
//!
//! Diabetes risk scoring and personalized recommendation engine.
//!
//! This crate provides:
//! - A trained stacking-ensemble pipeline turning raw clinical measurements
//!   into a calibrated risk tier
//! - Recommendation synthesis merging a static catalog with generated
//!   content under allergy/avoidance constraints
//! - Cost-bounded, TTL-cached specialist search near a location
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (ClinicalRecord, RiskTier, catalog items)
//! - `model`: Frozen model artifact and the inference pipeline
//! - `ports`: Trait definitions for external collaborators
//! - `adapters`: Concrete implementations (HTTP collaborators, in-memory stores)
//! - `application`: Use cases orchestrating domain, model, and ports

pub mod adapters;
pub mod application;
pub mod cache;
pub mod catalog;
pub mod domain;
pub mod model;
pub mod ports;

pub use domain::{ClinicalRecord, RiskResult, RiskTier};

/// Result type for GlucoGuard operations
pub type Result<T> = std::result::Result<T, GlucoguardError>;

/// Main error type for GlucoGuard
#[derive(Debug, thiserror::Error)]
pub enum GlucoguardError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Risk pipeline failed: {0}")]
    Model(#[from] model::ModelError),

    #[error("External service failed: {0}")]
    External(#[from] ports::ExternalServiceError),

    #[error("Location could not be resolved: {0}")]
    InvalidLocation(String),

    #[error("No matching result: {0}")]
    NotFound(String),

    #[error("Store operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GlucoguardError {
    /// Stable machine-readable code carried alongside the human-readable
    /// message on every user-visible failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Model(_) => "model_error",
            Self::External(_) => "external_service_error",
            Self::InvalidLocation(_) => "invalid_location",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GlucoguardError::Validation("x".into()).code(),
            "validation_error"
        );
        assert_eq!(GlucoguardError::NotFound("x".into()).code(), "not_found");
        assert_eq!(
            GlucoguardError::InvalidLocation("x".into()).code(),
            "invalid_location"
        );
    }
}
