//! Risk assessment result types.

use serde::{Deserialize, Serialize};

/// Probability below which an assessment is tiered Low.
const LOW_BELOW: f64 = 0.3;

/// Probability below which an assessment is tiered Moderate.
const MODERATE_BELOW: f64 = 0.7;

/// Risk tier classification for diabetes onset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Low risk of diabetes onset
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, intervention recommended
    High,
}

impl RiskTier {
    /// Map a model probability to its tier. Thresholds are fixed constants,
    /// not configurable per call.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_BELOW {
            Self::Low
        } else if probability < MODERATE_BELOW {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Moderate => "Moderate risk - Follow-up recommended",
            Self::High => "High risk - Consultation advised",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of a risk assessment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskResult {
    /// Binary prediction (0 = low-risk class, 1 = at-risk class)
    pub predicted_label: u8,

    /// Positive-class probability from the meta-classifier (0.0 to 1.0)
    pub probability: f64,

    /// Discrete tier derived from the probability
    pub tier: RiskTier,
}

impl RiskResult {
    /// Create a result from the meta-classifier's positive-class probability.
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            predicted_label: u8::from(probability >= 0.5),
            probability,
            tier: RiskTier::from_probability(probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds_exact() {
        assert_eq!(RiskTier::from_probability(0.29), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.30), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.69), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.70), RiskTier::High);
    }

    #[test]
    fn test_tier_monotonic() {
        let mut last = RiskTier::Low;
        for i in 0..=100 {
            let tier = RiskTier::from_probability(f64::from(i) / 100.0);
            let rank = |t: RiskTier| match t {
                RiskTier::Low => 0,
                RiskTier::Moderate => 1,
                RiskTier::High => 2,
            };
            assert!(rank(tier) >= rank(last));
            last = tier;
        }
    }

    #[test]
    fn test_label_from_probability() {
        assert_eq!(RiskResult::new(0.49).predicted_label, 0);
        assert_eq!(RiskResult::new(0.5).predicted_label, 1);
        assert_eq!(RiskResult::new(0.9).tier, RiskTier::High);
    }
}
