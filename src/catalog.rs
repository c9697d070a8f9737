//! Static catalog store: immutable meal and exercise reference data.
//!
//! Catalogs ship as JSON documents embedded at build time (with disk
//! loaders for overrides) and are validated once at startup, fail-closed,
//! the same way the model artifact is.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::domain::{DietType, ExerciseItem, MealItem, Provenance};
use crate::{GlucoguardError, Result};

const BUILTIN_MEALS_JSON: &str = include_str!("../data/meal_catalog.json");
const BUILTIN_EXERCISES_JSON: &str = include_str!("../data/exercise_catalog.json");

/// Immutable reference catalogs, loaded once at process start.
///
/// Meal and exercise ids live in independent id spaces; each is unique
/// within its own catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    meals: BTreeMap<DietType, Vec<MealItem>>,
    exercises: Vec<ExerciseItem>,
}

impl CatalogStore {
    /// Load the catalogs compiled into this build.
    ///
    /// # Errors
    /// Returns an error if the embedded documents are corrupt.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_MEALS_JSON, BUILTIN_EXERCISES_JSON)
    }

    /// Load catalogs from disk, for deployments overriding the built-ins.
    ///
    /// # Errors
    /// Returns an error if either file is unreadable or invalid.
    pub fn from_paths(meals_path: &Path, exercises_path: &Path) -> Result<Self> {
        let meals = std::fs::read_to_string(meals_path)?;
        let exercises = std::fs::read_to_string(exercises_path)?;
        Self::from_json(&meals, &exercises)
    }

    fn from_json(meals_json: &str, exercises_json: &str) -> Result<Self> {
        let meals: BTreeMap<DietType, Vec<MealItem>> = serde_json::from_str(meals_json)?;
        let exercises: Vec<ExerciseItem> = serde_json::from_str(exercises_json)?;

        let store = Self { meals, exercises };
        store.validate()?;

        tracing::info!(
            "Loaded catalogs: {} meals across {} diets, {} exercises",
            store.meals.values().map(Vec::len).sum::<usize>(),
            store.meals.len(),
            store.exercises.len(),
        );

        Ok(store)
    }

    fn validate(&self) -> Result<()> {
        let mut meal_ids = HashSet::new();
        for (diet, items) in &self.meals {
            for meal in items {
                if meal.id == 0 {
                    return Err(GlucoguardError::Validation(format!(
                        "meal '{}' has a non-positive id",
                        meal.name
                    )));
                }
                if meal.diet != *diet {
                    return Err(GlucoguardError::Validation(format!(
                        "meal {} is filed under {diet} but tagged {}",
                        meal.id, meal.diet
                    )));
                }
                if meal.provenance != Provenance::Catalog {
                    return Err(GlucoguardError::Validation(format!(
                        "catalog meal {} must not claim generated provenance",
                        meal.id
                    )));
                }
                if !meal_ids.insert(meal.id) {
                    return Err(GlucoguardError::Validation(format!(
                        "duplicate meal id {}",
                        meal.id
                    )));
                }
            }
        }

        let mut exercise_ids = HashSet::new();
        for exercise in &self.exercises {
            if exercise.id == 0 {
                return Err(GlucoguardError::Validation(format!(
                    "exercise '{}' has a non-positive id",
                    exercise.name
                )));
            }
            if !exercise_ids.insert(exercise.id) {
                return Err(GlucoguardError::Validation(format!(
                    "duplicate exercise id {}",
                    exercise.id
                )));
            }
        }

        Ok(())
    }

    /// Meals for one diet type; empty when the diet has no entries.
    #[must_use]
    pub fn meals_for(&self, diet: DietType) -> &[MealItem] {
        self.meals.get(&diet).map_or(&[], Vec::as_slice)
    }

    /// The full exercise catalog.
    #[must_use]
    pub fn exercises(&self) -> &[ExerciseItem] {
        &self.exercises
    }

    /// Largest meal id across every diet partition.
    #[must_use]
    pub fn max_meal_id(&self) -> u32 {
        self.meals
            .values()
            .flatten()
            .map(|meal| meal.id)
            .max()
            .unwrap_or(0)
    }

    /// Largest exercise id in the catalog.
    #[must_use]
    pub fn max_exercise_id(&self) -> u32 {
        self.exercises
            .iter()
            .map(|exercise| exercise.id)
            .max()
            .unwrap_or(0)
    }

    /// Look a meal up by id across every diet partition.
    #[must_use]
    pub fn find_meal(&self, id: u32) -> Option<&MealItem> {
        self.meals.values().flatten().find(|meal| meal.id == id)
    }

    /// Look an exercise up by id.
    #[must_use]
    pub fn find_exercise(&self, id: u32) -> Option<&ExerciseItem> {
        self.exercises.iter().find(|exercise| exercise.id == id)
    }
}
