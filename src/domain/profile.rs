//! User profile, assessment, and daily-log record types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{DietType, ExerciseItem, Intensity, MealItem};
use super::clinical::ClinicalRecord;
use super::risk::RiskResult;

/// Health and dietary profile of a user.
///
/// Consumed by recommendation filtering and prompt construction; the store
/// behind it is a plain key-value map with no durability guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub diet_type: DietType,
    pub allergies: Vec<String>,
    pub preferences: Vec<String>,
    pub avoidances: Vec<String>,
    pub diabetes_type: Option<String>,
    pub blood_sugar_levels: Option<String>,
    pub medication_details: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: None,
            gender: None,
            weight: None,
            height: None,
            activity_level: None,
            diet_type: DietType::Vegetarian,
            allergies: Vec::new(),
            preferences: Vec::new(),
            avoidances: Vec::new(),
            diabetes_type: None,
            blood_sugar_levels: None,
            medication_details: None,
            last_updated: None,
        }
    }
}

impl UserProfile {
    /// All exclusion terms: allergies first, then avoidances.
    #[must_use]
    pub fn exclusion_terms(&self) -> Vec<String> {
        self.allergies
            .iter()
            .chain(self.avoidances.iter())
            .cloned()
            .collect()
    }
}

/// The latest risk assessment of a user, overwritten on each prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub record: ClinicalRecord,
    pub result: RiskResult,
    pub assessed_at: DateTime<Utc>,
}

/// A meal logged for a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedMeal {
    pub meal: MealItem,
    pub date: NaiveDate,
}

/// An exercise session logged for a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub exercise: ExerciseItem,
    /// Minutes actually performed, as reported by the user
    pub user_duration: u32,
    pub date: NaiveDate,
}

/// Meal-plan slot within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Breakfast => write!(f, "Breakfast"),
            Self::Lunch => write!(f, "Lunch"),
            Self::Dinner => write!(f, "Dinner"),
        }
    }
}

/// One planned slot: a slot label plus the recipes filling it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub meal_type: MealSlot,
    pub recipes: Vec<MealItem>,
}

/// One day of a generated meal plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanDay {
    pub date: NaiveDate,
    pub meals: Vec<PlannedMeal>,
}

/// A multi-day meal plan, stored per user (latest wins).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealPlan {
    pub days: Vec<MealPlanDay>,
}

/// Aggregated view over one day's logged meals and exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub total_calories: f64,
    pub total_carbs: f64,
    /// "low", "medium", or "high"; "none" when nothing was logged
    pub avg_glycemic_index: String,
    pub total_exercise_minutes: u32,
    pub intensities: Vec<Intensity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_terms_order() {
        let profile = UserProfile {
            allergies: vec!["paneer".into()],
            avoidances: vec!["sugar".into(), "rice".into()],
            ..Default::default()
        };
        assert_eq!(profile.exclusion_terms(), vec!["paneer", "sugar", "rice"]);
    }

    #[test]
    fn test_default_profile_is_vegetarian() {
        assert_eq!(UserProfile::default().diet_type, DietType::Vegetarian);
    }
}
