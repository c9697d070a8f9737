//! Risk assessment service.
//!
//! The one path in the engine that never degrades: a risk number comes
//! from the real pipeline or not at all.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Assessment, ClinicalRecord, RiskResult};
use crate::model::RiskPipeline;
use crate::ports::ProfileStore;
use crate::{GlucoguardError, Result};

/// Service for running risk assessments.
pub struct RiskService<P>
where
    P: ProfileStore,
{
    pipeline: Arc<RiskPipeline>,
    profiles: Arc<P>,
}

impl<P> RiskService<P>
where
    P: ProfileStore,
{
    /// Create a new risk service.
    pub fn new(pipeline: Arc<RiskPipeline>, profiles: Arc<P>) -> Self {
        Self { pipeline, profiles }
    }

    /// Assess a clinical record and store the result as the user's latest
    /// assessment.
    ///
    /// # Errors
    /// Returns `Validation` for unusable input fields and `Model` if the
    /// pipeline fails. Pipeline failures are fatal for the request; there
    /// is no fallback path.
    pub fn assess(&self, user_id: &str, record: ClinicalRecord) -> Result<RiskResult> {
        record.validate().map_err(|fields| {
            GlucoguardError::Validation(format!(
                "non-numeric or negative fields: {}",
                fields.join(", ")
            ))
        })?;

        let result = self.pipeline.assess(&record)?;

        let assessment = Assessment {
            record,
            result,
            assessed_at: Utc::now(),
        };
        if let Err(e) = self.profiles.save_assessment(user_id, assessment) {
            tracing::warn!("Failed to store assessment for {user_id}: {e}");
        }

        tracing::info!(
            "Assessment for {user_id}: label={}, probability={:.4}, tier={}",
            result.predicted_label,
            result.probability,
            result.tier
        );

        Ok(result)
    }
}
