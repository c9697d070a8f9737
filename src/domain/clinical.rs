//! Clinical measurement types for diabetes risk prediction.
//!
//! Field set follows the Pima Indians diabetes dataset. A stored zero in
//! glucose, blood pressure, skin thickness, insulin, or BMI is a sentinel
//! for "missing", never a measured value.

use serde::{Deserialize, Serialize};

/// Raw clinical measurements submitted for a risk assessment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ClinicalRecord {
    /// Number of pregnancies
    pub pregnancies: f64,

    /// Plasma glucose concentration in mg/dL (0 = missing)
    pub glucose: f64,

    /// Diastolic blood pressure in mmHg (0 = missing)
    pub blood_pressure: f64,

    /// Triceps skin fold thickness in mm (0 = missing)
    pub skin_thickness: f64,

    /// 2-hour serum insulin in mu U/ml (0 = missing)
    pub insulin: f64,

    /// Body mass index in kg/m^2 (0 = missing)
    pub bmi: f64,

    /// Diabetes pedigree function score
    pub diabetes_pedigree: f64,

    /// Age in years
    pub age: f64,
}

impl ClinicalRecord {
    /// Validate that every field is a usable number.
    ///
    /// All fields must be finite and non-negative. Zero is accepted in the
    /// sentinel fields; imputation is the pipeline's job, not validation's.
    ///
    /// # Errors
    /// Returns the names of the offending fields.
    pub fn validate(&self) -> Result<(), Vec<&'static str>> {
        let mut bad = Vec::new();

        for (name, value) in [
            ("pregnancies", self.pregnancies),
            ("glucose", self.glucose),
            ("blood_pressure", self.blood_pressure),
            ("skin_thickness", self.skin_thickness),
            ("insulin", self.insulin),
            ("bmi", self.bmi),
            ("diabetes_pedigree", self.diabetes_pedigree),
            ("age", self.age),
        ] {
            if !value.is_finite() || value < 0.0 {
                bad.push(name);
            }
        }

        if bad.is_empty() {
            Ok(())
        } else {
            Err(bad)
        }
    }
}

/// Derived feature vector consumed by the model.
///
/// Insulin is excluded from the model input; it only feeds the
/// glucose/insulin ratio. Every `FeatureVector` is reproducible from a
/// `ClinicalRecord` plus the frozen training statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureVector {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub bmi: f64,
    pub diabetes_pedigree: f64,
    pub age: f64,
    /// glucose / (insulin + ε), capped at the frozen 95th-percentile value
    pub glucose_insulin_ratio: f64,
    /// 0 = underweight, 1 = normal, 2 = overweight, 3 = obese
    pub bmi_category: u8,
}

impl FeatureVector {
    /// Convert to the vector consumed by the scaler and base learners.
    /// Order matches the frozen artifact's `feature_names`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        vec![
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.bmi,
            self.diabetes_pedigree,
            self.age,
            self.glucose_insulin_ratio,
            f64::from(self.bmi_category),
        ]
    }
}

/// Feature names in model-input order.
pub const FEATURE_NAMES: [&str; 9] = [
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "bmi",
    "diabetes_pedigree",
    "age",
    "glucose_insulin_ratio",
    "bmi_category",
];

/// Categorize a BMI value: ≤18.5 underweight, ≤25 normal, ≤30 overweight,
/// above that obese.
#[must_use]
pub fn bmi_category(bmi: f64) -> u8 {
    if bmi <= 18.5 {
        0
    } else if bmi <= 25.0 {
        1
    } else if bmi <= 30.0 {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_accepts_sentinel_zero() {
        let record = ClinicalRecord {
            pregnancies: 2.0,
            glucose: 0.0,
            blood_pressure: 70.0,
            skin_thickness: 0.0,
            insulin: 0.0,
            bmi: 28.1,
            diabetes_pedigree: 0.42,
            age: 31.0,
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation_names_offending_fields() {
        let record = ClinicalRecord {
            glucose: f64::NAN,
            bmi: -3.0,
            ..Default::default()
        };
        let bad = record.validate().expect_err("must fail");
        assert_eq!(bad, vec!["glucose", "bmi"]);
    }

    #[test]
    fn test_bmi_category_bounds() {
        assert_eq!(bmi_category(17.0), 0);
        assert_eq!(bmi_category(18.5), 0);
        assert_eq!(bmi_category(22.0), 1);
        assert_eq!(bmi_category(25.0), 1);
        assert_eq!(bmi_category(27.5), 2);
        assert_eq!(bmi_category(30.0), 2);
        assert_eq!(bmi_category(30.1), 3);
    }

    #[test]
    fn test_feature_vector_order() {
        let features = FeatureVector {
            pregnancies: 1.0,
            glucose: 117.0,
            blood_pressure: 72.0,
            skin_thickness: 29.0,
            bmi: 32.3,
            diabetes_pedigree: 0.47,
            age: 33.0,
            glucose_insulin_ratio: 0.94,
            bmi_category: 3,
        };
        let v = features.to_vec();
        assert_eq!(v.len(), FEATURE_NAMES.len());
        assert!((v[1] - 117.0).abs() < f64::EPSILON);
        assert!((v[8] - 3.0).abs() < f64::EPSILON);
    }
}
