//! Catalog item types: meals and exercises.
//!
//! Catalog items are immutable reference data loaded once at startup.
//! Generated items share the same shape but carry `Provenance::Generated`
//! and receive their id from the recommendation merger.

use serde::{Deserialize, Serialize};

/// Diet type partitioning the meal catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    Vegetarian,
    NonVegetarian,
    Eggetarian,
    Vegan,
}

impl DietType {
    /// Parse a diet-type label as it appears in queries and profiles.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "vegetarian" => Some(Self::Vegetarian),
            "non-vegetarian" => Some(Self::NonVegetarian),
            "eggetarian" => Some(Self::Eggetarian),
            "vegan" => Some(Self::Vegan),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::NonVegetarian => "non-vegetarian",
            Self::Eggetarian => "eggetarian",
            Self::Vegan => "vegan",
        }
    }
}

impl std::fmt::Display for DietType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Glycemic-index bucket of a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlycemicIndex {
    Low,
    Medium,
    High,
}

/// Exercise intensity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

/// Where a recommendation item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    #[default]
    Catalog,
    Generated,
}

/// A meal, either from the static catalog or generated on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealItem {
    /// Positive id, unique within the meal catalog
    pub id: u32,
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub carbs: f64,
    pub glycemic_index: GlycemicIndex,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub nutritional_benefits: String,
    pub diet: DietType,
    /// Rule-derived guidance, filled by the advisory annotator when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl MealItem {
    /// Case-insensitive query match against name, description, or any
    /// ingredient. An empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(&query))
    }

    /// Whether the name or joined ingredient text contains the term
    /// (case-insensitive substring). Used for allergy/avoidance exclusion.
    #[must_use]
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&term)
            || self.ingredients.join(" ").to_lowercase().contains(&term)
    }
}

/// An exercise, either from the static catalog or generated on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseItem {
    /// Positive id, unique within the exercise catalog
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Suggested duration in minutes
    pub duration: u32,
    pub intensity: Intensity,
    pub benefits: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Rule-based meal guidance keyed on (glycemic-index bucket, carb threshold).
/// Total function: every input pair maps to one of four canned strings.
#[must_use]
pub fn meal_advisory(glycemic_index: GlycemicIndex, carbs: f64) -> &'static str {
    match glycemic_index {
        GlycemicIndex::Low if carbs < 30.0 => {
            "Excellent choice for blood sugar management. \
             Low carb content helps prevent blood sugar spikes."
        }
        GlycemicIndex::Low => {
            "Good choice with moderate carbs. \
             Monitor portion size to maintain stable blood sugar."
        }
        GlycemicIndex::Medium => {
            "Pair with a protein source and fiber-rich vegetables \
             to slow carbohydrate absorption."
        }
        GlycemicIndex::High => {
            "Consider reducing portion size and pairing with healthy fats \
             to reduce glycemic impact."
        }
    }
}

/// Rule-based exercise guidance keyed on intensity. Total function.
#[must_use]
pub fn exercise_advisory(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Low => {
            "Gentle enough for a daily habit. Consistency matters more \
             than intensity for insulin sensitivity."
        }
        Intensity::Moderate => {
            "Check blood glucose before and after the session until you \
             know how your body responds."
        }
        Intensity::High => {
            "High intensity can trigger hypoglycemia, especially with \
             insulin therapy. Keep fast-acting carbs at hand."
        }
    }
}
