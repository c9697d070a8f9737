//! Recommendation service: catalog filtering, shortfall generation,
//! collision-free merging, and advisory annotation.
//!
//! Cost control: the external generative call only ever fills a shortfall.
//! When the constraint-filtered catalog already covers the target count,
//! no generation happens. When generation fails or returns garbage, the
//! response degrades to catalog-only results instead of erroring.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Deserializer};

use crate::adapters::text::strip_code_fences;
use crate::adapters::StorageError;
use crate::catalog::CatalogStore;
use crate::domain::{
    exercise_advisory, meal_advisory, Assessment, DietType, ExerciseItem, GlycemicIndex,
    Intensity, MealItem, MealPlan, MealPlanDay, MealSlot, PlannedMeal, Provenance, UserProfile,
};
use crate::ports::{ProfileStore, TextGenerator};
use crate::{GlucoguardError, Result};

/// Recommendations aim for this many items before generating more.
const TARGET_COUNT: usize = 3;

/// Per-user cache of the last generated exercise recommendations.
///
/// Explicit injected state shared between the recommendation and tracking
/// services, so a generated exercise stays resolvable by id when the user
/// logs it later. Process lifetime, never persisted.
#[derive(Debug, Default)]
pub struct RecommendationCache {
    exercises: Mutex<HashMap<String, Vec<ExerciseItem>>>,
}

impl RecommendationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached recommendations for one user.
    pub fn store(&self, user_id: &str, items: Vec<ExerciseItem>) {
        let mut exercises = self.exercises.lock().unwrap_or_else(|e| e.into_inner());
        exercises.insert(user_id.to_string(), items);
    }

    /// The cached recommendations for one user, if any.
    #[must_use]
    pub fn exercises_for(&self, user_id: &str) -> Vec<ExerciseItem> {
        let exercises = self.exercises.lock().unwrap_or_else(|e| e.into_inner());
        exercises.get(user_id).cloned().unwrap_or_default()
    }

    /// Resolve a cached generated exercise by id.
    #[must_use]
    pub fn find_exercise(&self, user_id: &str, id: u32) -> Option<ExerciseItem> {
        let exercises = self.exercises.lock().unwrap_or_else(|e| e.into_inner());
        exercises
            .get(user_id)
            .and_then(|items| items.iter().find(|item| item.id == id))
            .cloned()
    }
}

/// Service for meal and exercise recommendations.
pub struct RecommendationService<G, P>
where
    G: TextGenerator,
    P: ProfileStore,
{
    catalog: Arc<CatalogStore>,
    generator: Arc<G>,
    profiles: Arc<P>,
    recommended: Arc<RecommendationCache>,
}

impl<G, P> RecommendationService<G, P>
where
    G: TextGenerator,
    P: ProfileStore,
    P::Error: Into<StorageError>,
{
    /// Create a new recommendation service.
    pub fn new(
        catalog: Arc<CatalogStore>,
        generator: Arc<G>,
        profiles: Arc<P>,
        recommended: Arc<RecommendationCache>,
    ) -> Self {
        Self {
            catalog,
            generator,
            profiles,
            recommended,
        }
    }

    /// Search meals matching `query` under the user's diet and exclusion
    /// constraints, generating supplemental recipes only to fill a
    /// shortfall below the target count.
    ///
    /// # Errors
    /// Returns `Storage` if the profile store fails. Generator failures do
    /// not error; they degrade to catalog-only results.
    pub fn recommend_meals(&self, user_id: &str, query: &str) -> Result<Vec<MealItem>> {
        let profile = self.profile_or_default(user_id)?;
        let terms = profile.exclusion_terms();

        let mut combined: Vec<MealItem> = self
            .catalog
            .meals_for(profile.diet_type)
            .iter()
            .filter(|meal| meal.matches_query(query))
            .filter(|meal| !terms.iter().any(|term| meal.mentions(term)))
            .cloned()
            .collect();

        if combined.len() < TARGET_COUNT {
            let shortfall = TARGET_COUNT - combined.len();
            let prompt = meal_prompt(query, &profile, shortfall);
            let generated = match self.generator.generate(&prompt, true) {
                Ok(text) => parse_generated_meals(&text),
                Err(e) => {
                    tracing::warn!("Meal generation failed, serving catalog-only results: {e}");
                    Vec::new()
                }
            };
            let next_id = self.catalog.max_meal_id() + 1;
            combined.extend(materialize_meals(generated, profile.diet_type, next_id));
        } else {
            tracing::debug!(
                "Catalog covered '{query}' with {} meals, skipping generation",
                combined.len()
            );
        }

        Ok(annotate_meals(dedupe_meals(combined)))
    }

    /// Recommend exercises for the user: generated suggestions first
    /// (cached per user), then the static catalog, deduplicated by id.
    ///
    /// # Errors
    /// Returns `Storage` if the profile store fails. Generator failures
    /// degrade to the static exercise list.
    pub fn recommend_exercises(&self, user_id: &str) -> Result<Vec<ExerciseItem>> {
        let profile = self.profile_or_default(user_id)?;
        let assessment = self
            .profiles
            .last_assessment(user_id)
            .map_err(|e| GlucoguardError::Storage(e.into()))?;

        let prompt = exercise_prompt(&profile, assessment.as_ref());
        let generated = match self.generator.generate(&prompt, true) {
            Ok(text) => {
                let next_id = self.catalog.max_exercise_id() + 1;
                let items = materialize_exercises(parse_generated_exercises(&text), next_id);
                self.recommended.store(user_id, items.clone());
                items
            }
            Err(e) => {
                tracing::warn!("Exercise generation failed, serving static list: {e}");
                Vec::new()
            }
        };

        let mut combined = generated;
        combined.extend(self.catalog.exercises().iter().cloned());

        Ok(annotate_exercises(dedupe_exercises(combined)))
    }

    /// Generate a multi-day meal plan (Breakfast/Lunch/Dinner per day) from
    /// the user's constraint-filtered diet catalog, and store it as the
    /// user's latest plan.
    ///
    /// # Errors
    /// Returns `Validation` for a zero day count and `Storage` if the
    /// profile store fails.
    pub fn generate_meal_plan(
        &self,
        user_id: &str,
        days: u32,
        start_date: NaiveDate,
    ) -> Result<MealPlan> {
        if days == 0 {
            return Err(GlucoguardError::Validation(
                "meal plan needs at least one day".into(),
            ));
        }

        let profile = self.profile_or_default(user_id)?;
        let mut rng = ChaCha20Rng::from_entropy();
        let plan = self.plan_with_rng(&profile, days, start_date, &mut rng);

        self.profiles
            .save_meal_plan(user_id, plan.clone())
            .map_err(|e| GlucoguardError::Storage(e.into()))?;

        tracing::info!(
            "Generated {}-day meal plan for {user_id} starting {start_date}",
            plan.days.len()
        );
        Ok(plan)
    }

    fn plan_with_rng(
        &self,
        profile: &UserProfile,
        days: u32,
        start_date: NaiveDate,
        rng: &mut impl Rng,
    ) -> MealPlan {
        let terms: Vec<String> = profile
            .exclusion_terms()
            .iter()
            .map(|term| term.to_lowercase())
            .collect();
        // The plan path excludes on the meal name only.
        let available: Vec<&MealItem> = self
            .catalog
            .meals_for(profile.diet_type)
            .iter()
            .filter(|meal| {
                let name = meal.name.to_lowercase();
                !terms.iter().any(|term| !term.is_empty() && name.contains(term))
            })
            .collect();

        let mut plan_days = Vec::new();
        for offset in 0..days {
            let Some(date) = start_date.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let mut meals = Vec::new();
            for slot in MealSlot::ALL {
                if let Some(meal) = available.choose(rng) {
                    meals.push(PlannedMeal {
                        meal_type: slot,
                        recipes: vec![(*meal).clone()],
                    });
                }
            }
            plan_days.push(MealPlanDay { date, meals });
        }

        MealPlan { days: plan_days }
    }

    fn profile_or_default(&self, user_id: &str) -> Result<UserProfile> {
        Ok(self
            .profiles
            .profile(user_id)
            .map_err(|e| GlucoguardError::Storage(e.into()))?
            .unwrap_or_default())
    }
}

/// Generated recipe payload, tolerant of the collaborator's looser shape.
#[derive(Debug, Deserialize)]
struct GeneratedMeal {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    calories: f64,
    #[serde(default = "default_carbs")]
    carbs: f64,
    #[serde(default = "default_glycemic_index")]
    glycemic_index: GlycemicIndex,
    #[serde(default, deserialize_with = "ingredients_list")]
    ingredients: Vec<String>,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    nutritional_benefits: String,
}

/// Generated exercise payload.
#[derive(Debug, Deserialize)]
struct GeneratedExercise {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_duration")]
    duration: f64,
    #[serde(default = "default_intensity")]
    intensity: Intensity,
    #[serde(default)]
    benefits: String,
}

fn default_carbs() -> f64 {
    30.0
}

fn default_glycemic_index() -> GlycemicIndex {
    GlycemicIndex::Low
}

fn default_duration() -> f64 {
    20.0
}

fn default_intensity() -> Intensity {
    Intensity::Moderate
}

/// Accept ingredients as either a list or a comma-joined string.
fn ingredients_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Many(list) => list,
        Raw::One(joined) => joined
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
    })
}

/// Parse a generated payload into recipes. Fences are stripped first; a
/// bare object counts as a one-element list; anything unparseable becomes
/// empty output rather than a request failure.
fn parse_generated_meals(text: &str) -> Vec<GeneratedMeal> {
    parse_generated_items(text, "meals")
}

fn parse_generated_exercises(text: &str) -> Vec<GeneratedExercise> {
    parse_generated_items(text, "exercises")
}

fn parse_generated_items<T: serde::de::DeserializeOwned>(text: &str, kind: &str) -> Vec<T> {
    let inner = strip_code_fences(text);
    if inner.is_empty() {
        return Vec::new();
    }

    let value: serde_json::Value = match serde_json::from_str(inner) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to parse generated {kind} as JSON: {e}");
            return Vec::new();
        }
    };

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => vec![other],
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<T>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Dropping malformed generated {kind} entry: {e}");
                None
            }
        })
        .collect()
}

/// Assign ids strictly above every known catalog id, monotonic across the
/// batch, and tag provenance.
fn materialize_meals(generated: Vec<GeneratedMeal>, diet: DietType, next_id: u32) -> Vec<MealItem> {
    generated
        .into_iter()
        .enumerate()
        .map(|(offset, meal)| MealItem {
            id: next_id + offset as u32,
            name: meal.name,
            description: meal.description,
            calories: meal.calories,
            carbs: meal.carbs,
            glycemic_index: meal.glycemic_index,
            ingredients: meal.ingredients,
            instructions: meal.instructions,
            nutritional_benefits: meal.nutritional_benefits,
            diet,
            advisory: None,
            provenance: Provenance::Generated,
        })
        .collect()
}

fn materialize_exercises(generated: Vec<GeneratedExercise>, next_id: u32) -> Vec<ExerciseItem> {
    generated
        .into_iter()
        .enumerate()
        .map(|(offset, exercise)| ExerciseItem {
            id: next_id + offset as u32,
            name: exercise.name,
            description: exercise.description,
            duration: exercise.duration.round().max(0.0) as u32,
            intensity: exercise.intensity,
            benefits: exercise.benefits,
            advisory: None,
            provenance: Provenance::Generated,
        })
        .collect()
}

fn dedupe_meals(meals: Vec<MealItem>) -> Vec<MealItem> {
    let mut seen = HashSet::new();
    meals
        .into_iter()
        .filter(|meal| seen.insert(meal.id))
        .collect()
}

fn dedupe_exercises(exercises: Vec<ExerciseItem>) -> Vec<ExerciseItem> {
    let mut seen = HashSet::new();
    exercises
        .into_iter()
        .filter(|exercise| seen.insert(exercise.id))
        .collect()
}

fn annotate_meals(meals: Vec<MealItem>) -> Vec<MealItem> {
    meals
        .into_iter()
        .map(|mut meal| {
            if meal.advisory.is_none() {
                meal.advisory = Some(meal_advisory(meal.glycemic_index, meal.carbs).to_string());
            }
            meal
        })
        .collect()
}

fn annotate_exercises(exercises: Vec<ExerciseItem>) -> Vec<ExerciseItem> {
    exercises
        .into_iter()
        .map(|mut exercise| {
            if exercise.advisory.is_none() {
                exercise.advisory = Some(exercise_advisory(exercise.intensity).to_string());
            }
            exercise
        })
        .collect()
}

fn list_or_none(terms: &[String]) -> String {
    if terms.is_empty() {
        "None".to_string()
    } else {
        terms.join(", ")
    }
}

fn meal_prompt(query: &str, profile: &UserProfile, shortfall: usize) -> String {
    let diet = profile.diet_type;
    let diabetes_type = profile.diabetes_type.as_deref().unwrap_or("Type 2");
    let blood_sugar = profile.blood_sugar_levels.as_deref().unwrap_or("normal");
    let mut exclusions = profile.allergies.clone();
    exclusions.extend(profile.avoidances.iter().cloned());
    let exclusions = if exclusions.is_empty() {
        "No specific exclusions".to_string()
    } else {
        exclusions.join(", ")
    };

    format!(
        "Create {shortfall} diabetes-friendly Indian recipes matching the query: '{query}'.\n\
         User health profile:\n\
         - Diet type: {diet}\n\
         - Diabetes type: {diabetes_type}\n\
         - Recent blood sugar trend: {blood_sugar}\n\
         - Allergies: {allergies}\n\
         - Foods to avoid: {avoidances}\n\
         Recipe requirements:\n\
         - Must be suitable for a {diet} diet\n\
         - Must exclude these ingredients: {exclusions}\n\
         - Focus on low to medium glycemic index ingredients\n\
         - Include specific diabetes management benefits in the nutritional_benefits field\n\
         - Portion sizes should be appropriate for diabetes management\n\
         Return a JSON list of objects with fields: name, description, calories, carbs, \
         glycemic_index (low/medium/high), ingredients, instructions, nutritional_benefits. \
         Return only JSON data without any explanations or comments.",
        allergies = list_or_none(&profile.allergies),
        avoidances = list_or_none(&profile.avoidances),
    )
}

fn exercise_prompt(profile: &UserProfile, assessment: Option<&Assessment>) -> String {
    let activity_level = profile.activity_level.as_deref().unwrap_or("moderate");
    let diabetes_type = profile.diabetes_type.as_deref().unwrap_or("Type 2");
    let blood_sugar = profile.blood_sugar_levels.as_deref().unwrap_or("normal");
    let age = profile
        .age
        .map_or_else(|| "unknown".to_string(), |age| age.to_string());
    let bmi = assessment.map_or_else(
        || "unknown".to_string(),
        |a| format!("{:.1}", a.record.bmi),
    );

    format!(
        "Create 3 diabetes-friendly exercise recommendations tailored for an Indian user \
         with the following profile:\n\
         - Age: {age}\n\
         - Activity level: {activity_level}\n\
         - Diabetes type: {diabetes_type}\n\
         - Recent blood sugar levels: {blood_sugar}\n\
         - BMI: {bmi}\n\
         Exercise requirements:\n\
         - Must be suitable for diabetes management, prioritizing blood sugar control\n\
         - Must match the user's activity level ({activity_level})\n\
         - For Type 1 diabetes, avoid high-intensity exercises to prevent hypoglycemia\n\
         - Focus on accessible activities available in India\n\
         - Duration should be appropriate for the user's profile (15-30 minutes)\n\
         Return a JSON list of objects with fields: name, description, duration, \
         intensity (low/moderate/high), benefits. \
         Return only JSON data without any explanations or comments.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProfileStore;
    use crate::ports::ExternalServiceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Scripted {
        Text(&'static str),
        Fail,
    }

    struct FakeGenerator {
        response: Scripted,
        calls: AtomicUsize,
    }

    impl FakeGenerator {
        fn returning(text: &'static str) -> Self {
            Self {
                response: Scripted::Text(text),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Scripted::Fail,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextGenerator for FakeGenerator {
        fn generate(
            &self,
            _prompt: &str,
            _expect_structured: bool,
        ) -> std::result::Result<String, ExternalServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Scripted::Text(text) => Ok((*text).to_string()),
                Scripted::Fail => Err(ExternalServiceError::Transport("down".into())),
            }
        }
    }

    fn service(
        generator: FakeGenerator,
    ) -> (
        RecommendationService<FakeGenerator, InMemoryProfileStore>,
        Arc<FakeGenerator>,
        Arc<InMemoryProfileStore>,
        Arc<RecommendationCache>,
    ) {
        let catalog = Arc::new(CatalogStore::builtin().expect("catalog"));
        let generator = Arc::new(generator);
        let profiles = Arc::new(InMemoryProfileStore::new());
        let cache = Arc::new(RecommendationCache::new());
        let service = RecommendationService::new(
            catalog,
            Arc::clone(&generator),
            Arc::clone(&profiles),
            Arc::clone(&cache),
        );
        (service, generator, profiles, cache)
    }

    fn profile_with_allergy(allergy: &str) -> UserProfile {
        UserProfile {
            allergies: vec![allergy.to_string()],
            ..Default::default()
        }
    }

    const GENERATED_MEALS: &str = r#"```json
    [
      {
        "name": "Methi Thepla with Curd",
        "description": "Fenugreek flatbread",
        "calories": 260,
        "carbs": 28,
        "glycemic_index": "low",
        "ingredients": "Fenugreek Leaves, Whole Wheat Flour, Curd",
        "instructions": "Knead, roll, roast.",
        "nutritional_benefits": "Fenugreek supports glucose control."
      },
      {
        "name": "Karela Sabzi",
        "description": "Bitter gourd dry curry",
        "ingredients": ["Bitter Gourd", "Onions"]
      }
    ]
    ```"#;

    #[test]
    fn test_sufficient_local_results_skip_generator() {
        let (svc, generator, profiles, _cache) = service(FakeGenerator::returning("[]"));
        profiles
            .save_profile("u1", profile_with_allergy("paneer"))
            .expect("save");

        let results = svc.recommend_meals("u1", "").expect("search");

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        // Only Palak Paneer (id 3) mentions paneer within the vegetarian
        // partition, leaving nine matches.
        assert!(results.iter().all(|meal| !meal.mentions("paneer")));
        assert!(results.len() >= TARGET_COUNT);
    }

    #[test]
    fn test_shortfall_invokes_generator_and_merges() {
        let (svc, generator, _profiles, _cache) = service(FakeGenerator::returning(GENERATED_MEALS));

        let results = svc.recommend_meals("u1", "thepla").expect("search");

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(results.len(), 2);
        // Generated ids start above the catalog maximum.
        let max_catalog = CatalogStore::builtin().expect("catalog").max_meal_id();
        assert!(results.iter().all(|meal| meal.id > max_catalog));
        assert_eq!(results[0].id + 1, results[1].id);
        assert!(results
            .iter()
            .all(|meal| meal.provenance == Provenance::Generated));
        // The comma-joined ingredient string was split.
        assert_eq!(results[0].ingredients.len(), 3);
        // Missing glycemic_index defaulted to low; advisory always filled.
        assert_eq!(results[1].glycemic_index, GlycemicIndex::Low);
        assert!(results.iter().all(|meal| meal.advisory.is_some()));
    }

    #[test]
    fn test_no_duplicate_ids_in_results() {
        let (svc, _generator, _profiles, _cache) = service(FakeGenerator::returning(GENERATED_MEALS));
        let results = svc.recommend_meals("u1", "dal").expect("search");

        let mut ids: Vec<u32> = results.iter().map(|meal| meal.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), results.len());
    }

    #[test]
    fn test_generator_failure_degrades_to_catalog_only() {
        let (svc, generator, _profiles, _cache) = service(FakeGenerator::failing());

        let results = svc.recommend_meals("u1", "khichdi").expect("search");

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(results
            .iter()
            .all(|meal| meal.provenance == Provenance::Catalog));
        assert!(!results.is_empty());
    }

    #[test]
    fn test_malformed_generation_degrades_to_catalog_only() {
        let (svc, _generator, _profiles, _cache) =
            service(FakeGenerator::returning("sorry, I cannot do that"));

        let results = svc.recommend_meals("u1", "khichdi").expect("search");
        assert!(results
            .iter()
            .all(|meal| meal.provenance == Provenance::Catalog));
    }

    #[test]
    fn test_bare_object_payload_is_accepted() {
        let meals = parse_generated_meals(r#"{"name": "Oats Chilla", "carbs": 22}"#);
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Oats Chilla");
        assert!((meals[0].carbs - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exercise_recommendations_merge_and_cache() {
        const GENERATED_EXERCISES: &str = r#"[
            {"name": "Evening Walk", "description": "Post-dinner walk",
             "duration": 25, "intensity": "low", "benefits": "Lowers post-meal glucose."},
            {"name": "Chair Yoga", "description": "Seated stretches"}
        ]"#;
        let (svc, _generator, _profiles, cache) =
            service(FakeGenerator::returning(GENERATED_EXERCISES));

        let results = svc.recommend_exercises("u1").expect("recommend");

        // 2 generated + 6 static, generated first with ids above the catalog.
        assert_eq!(results.len(), 8);
        assert_eq!(results[0].id, 7);
        assert_eq!(results[1].id, 8);
        assert_eq!(results[0].provenance, Provenance::Generated);
        assert!(results.iter().skip(2).all(|e| e.provenance == Provenance::Catalog));
        assert!(results.iter().all(|e| e.advisory.is_some()));

        // Cached per user for later id resolution.
        assert_eq!(cache.exercises_for("u1").len(), 2);
        assert!(cache.find_exercise("u1", 7).is_some());
        assert!(cache.find_exercise("u2", 7).is_none());
    }

    #[test]
    fn test_exercise_generation_failure_serves_static_list() {
        let (svc, _generator, _profiles, cache) = service(FakeGenerator::failing());

        let results = svc.recommend_exercises("u1").expect("recommend");
        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|e| e.provenance == Provenance::Catalog));
        assert!(cache.exercises_for("u1").is_empty());
    }

    #[test]
    fn test_meal_plan_respects_constraints() {
        let (svc, _generator, profiles, _cache) = service(FakeGenerator::returning("[]"));
        profiles
            .save_profile("u1", profile_with_allergy("paneer"))
            .expect("save");

        let start = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let profile = profiles.profile("u1").expect("get").expect("present");
        let plan = svc.plan_with_rng(&profile, 7, start, &mut rng);

        assert_eq!(plan.days.len(), 7);
        for (offset, day) in plan.days.iter().enumerate() {
            assert_eq!(
                day.date,
                start
                    .checked_add_days(Days::new(offset as u64))
                    .expect("date")
            );
            assert_eq!(day.meals.len(), 3);
            for planned in &day.meals {
                for recipe in &planned.recipes {
                    assert!(!recipe.name.to_lowercase().contains("paneer"));
                    assert_eq!(recipe.diet, DietType::Vegetarian);
                }
            }
        }
    }

    #[test]
    fn test_meal_plan_is_stored_per_user() {
        let (svc, _generator, profiles, _cache) = service(FakeGenerator::returning("[]"));
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");

        svc.generate_meal_plan("u1", 3, start).expect("plan");
        let stored = profiles.meal_plan("u1").expect("get").expect("present");
        assert_eq!(stored.days.len(), 3);
    }

    #[test]
    fn test_meal_plan_rejects_zero_days() {
        let (svc, _generator, _profiles, _cache) = service(FakeGenerator::returning("[]"));
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");

        let err = svc.generate_meal_plan("u1", 0, start).expect_err("fail");
        assert_eq!(err.code(), "validation_error");
    }
}
