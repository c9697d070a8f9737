//! Specialist profile types for the geo search path.

use serde::{Deserialize, Serialize};

/// Geographic coordinates returned by the geocoding collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A single review attached to a specialist profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistReview {
    pub author: String,
    pub rating: f64,
    pub text: String,
    pub time: String,
}

/// An enriched diabetes-specialist profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialistProfile {
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub total_reviews: u32,
    /// Heuristic experience label, see [`experience_label`]
    pub experience: String,
    pub phone: String,
    pub website: String,
    pub reviews: Vec<SpecialistReview>,
}

/// Deterministic, explainable substitute for unavailable years-of-practice
/// data: review count above 50 dominates, then a rating above 4.0.
#[must_use]
pub fn experience_label(total_reviews: u32, rating: f64) -> &'static str {
    if total_reviews > 50 {
        "Likely experienced"
    } else if rating > 4.0 {
        "Possibly experienced"
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_label_heuristic() {
        assert_eq!(experience_label(51, 0.0), "Likely experienced");
        assert_eq!(experience_label(50, 4.5), "Possibly experienced");
        assert_eq!(experience_label(10, 4.1), "Possibly experienced");
        assert_eq!(experience_label(10, 4.0), "Unknown");
        assert_eq!(experience_label(0, 0.0), "Unknown");
    }
}
