//! Daily tracking: meal/exercise logging and the per-day summary.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::StorageError;
use crate::application::RecommendationCache;
use crate::catalog::CatalogStore;
use crate::domain::{DailySummary, GlycemicIndex, LoggedExercise, LoggedMeal};
use crate::ports::DailyLog;
use crate::{GlucoguardError, Result};

/// Service for the date-keyed meal and exercise logs.
pub struct TrackingService<L>
where
    L: DailyLog,
{
    log: Arc<L>,
    catalog: Arc<CatalogStore>,
    recommended: Arc<RecommendationCache>,
}

impl<L> TrackingService<L>
where
    L: DailyLog,
    L::Error: Into<StorageError>,
{
    /// Create a new tracking service.
    pub fn new(
        log: Arc<L>,
        catalog: Arc<CatalogStore>,
        recommended: Arc<RecommendationCache>,
    ) -> Self {
        Self {
            log,
            catalog,
            recommended,
        }
    }

    /// Log a catalog meal for a day. A meal already logged for that day is
    /// left as-is rather than duplicated.
    ///
    /// # Errors
    /// Returns `NotFound` for an unknown meal id and `Storage` on log
    /// failure.
    pub fn log_meal(&self, user_id: &str, meal_id: u32, date: NaiveDate) -> Result<()> {
        let meal = self
            .catalog
            .find_meal(meal_id)
            .ok_or_else(|| GlucoguardError::NotFound(format!("meal with id {meal_id}")))?
            .clone();

        let already_logged = self
            .log
            .meals_on(user_id, date)
            .map_err(|e| GlucoguardError::Storage(e.into()))?
            .iter()
            .any(|entry| entry.meal.id == meal_id);
        if already_logged {
            return Ok(());
        }

        self.log
            .add_meal(user_id, LoggedMeal { meal, date })
            .map_err(|e| GlucoguardError::Storage(e.into()))
    }

    /// The meals logged for one day.
    ///
    /// # Errors
    /// Returns `Storage` on log failure.
    pub fn meals_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<LoggedMeal>> {
        self.log
            .meals_on(user_id, date)
            .map_err(|e| GlucoguardError::Storage(e.into()))
    }

    /// Remove a logged meal.
    ///
    /// # Errors
    /// Returns `NotFound` when nothing matched and `Storage` on log
    /// failure.
    pub fn remove_meal(&self, user_id: &str, meal_id: u32, date: NaiveDate) -> Result<()> {
        let removed = self
            .log
            .remove_meal(user_id, date, meal_id)
            .map_err(|e| GlucoguardError::Storage(e.into()))?;
        if removed {
            Ok(())
        } else {
            Err(GlucoguardError::NotFound(format!(
                "no logged meal with id {meal_id} on {date}"
            )))
        }
    }

    /// Log an exercise session. The id is resolved against the static
    /// catalog first, then the user's last generated recommendations.
    ///
    /// # Errors
    /// Returns `Validation` for a zero duration, `NotFound` for an
    /// unresolvable id, and `Storage` on log failure.
    pub fn log_exercise(
        &self,
        user_id: &str,
        exercise_id: u32,
        user_duration: u32,
        date: NaiveDate,
    ) -> Result<()> {
        if user_duration == 0 {
            return Err(GlucoguardError::Validation(
                "exercise duration is required".into(),
            ));
        }

        let exercise = self
            .catalog
            .find_exercise(exercise_id)
            .cloned()
            .or_else(|| self.recommended.find_exercise(user_id, exercise_id))
            .ok_or_else(|| {
                GlucoguardError::NotFound(format!("exercise with id {exercise_id}"))
            })?;

        self.log
            .add_exercise(
                user_id,
                LoggedExercise {
                    exercise,
                    user_duration,
                    date,
                },
            )
            .map_err(|e| GlucoguardError::Storage(e.into()))
    }

    /// The exercises logged for one day.
    ///
    /// # Errors
    /// Returns `Storage` on log failure.
    pub fn exercises_on(&self, user_id: &str, date: NaiveDate) -> Result<Vec<LoggedExercise>> {
        self.log
            .exercises_on(user_id, date)
            .map_err(|e| GlucoguardError::Storage(e.into()))
    }

    /// Aggregate one day's logs: calorie and carb totals, an average
    /// glycemic-index label, and the exercise picture.
    ///
    /// # Errors
    /// Returns `Storage` on log failure.
    pub fn daily_summary(&self, user_id: &str, date: NaiveDate) -> Result<DailySummary> {
        let meals = self.meals_on(user_id, date)?;
        let exercises = self.exercises_on(user_id, date)?;

        let total_calories = meals.iter().map(|entry| entry.meal.calories).sum();
        let total_carbs = meals.iter().map(|entry| entry.meal.carbs).sum();
        let avg_glycemic_index = average_gi_label(
            meals
                .iter()
                .map(|entry| entry.meal.glycemic_index)
                .collect::<Vec<_>>()
                .as_slice(),
        );

        Ok(DailySummary {
            total_calories,
            total_carbs,
            avg_glycemic_index: avg_glycemic_index.to_string(),
            total_exercise_minutes: exercises.iter().map(|entry| entry.user_duration).sum(),
            intensities: exercises
                .iter()
                .map(|entry| entry.exercise.intensity)
                .collect(),
        })
    }
}

/// Label the mean of per-meal GI scores (low=1, medium=2, high=3):
/// ≤1.5 low, ≤2.5 medium, above that high. "none" with no data.
fn average_gi_label(values: &[GlycemicIndex]) -> &'static str {
    if values.is_empty() {
        return "none";
    }
    let sum: u32 = values
        .iter()
        .map(|gi| match gi {
            GlycemicIndex::Low => 1u32,
            GlycemicIndex::Medium => 2,
            GlycemicIndex::High => 3,
        })
        .sum();
    let mean = f64::from(sum) / values.len() as f64;
    if mean <= 1.5 {
        "low"
    } else if mean <= 2.5 {
        "medium"
    } else {
        "high"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDailyLog;
    use crate::domain::{ExerciseItem, Intensity, Provenance};

    fn service() -> (TrackingService<InMemoryDailyLog>, Arc<RecommendationCache>) {
        let cache = Arc::new(RecommendationCache::new());
        let service = TrackingService::new(
            Arc::new(InMemoryDailyLog::new()),
            Arc::new(CatalogStore::builtin().expect("catalog")),
            Arc::clone(&cache),
        );
        (service, cache)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date")
    }

    #[test]
    fn test_log_meal_deduplicates_per_day() {
        let (svc, _cache) = service();
        svc.log_meal("u1", 1, date()).expect("log");
        svc.log_meal("u1", 1, date()).expect("log again");
        assert_eq!(svc.meals_on("u1", date()).expect("list").len(), 1);
    }

    #[test]
    fn test_log_meal_unknown_id_is_not_found() {
        let (svc, _cache) = service();
        let err = svc.log_meal("u1", 999, date()).expect_err("must fail");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_remove_meal_round_trip() {
        let (svc, _cache) = service();
        svc.log_meal("u1", 2, date()).expect("log");
        svc.remove_meal("u1", 2, date()).expect("remove");
        assert!(svc.meals_on("u1", date()).expect("list").is_empty());
        assert_eq!(
            svc.remove_meal("u1", 2, date()).expect_err("gone").code(),
            "not_found"
        );
    }

    #[test]
    fn test_log_exercise_resolves_generated_id_from_cache() {
        let (svc, cache) = service();
        cache.store(
            "u1",
            vec![ExerciseItem {
                id: 7,
                name: "Evening Walk".into(),
                description: "Post-dinner walk".into(),
                duration: 25,
                intensity: Intensity::Low,
                benefits: "Lowers post-meal glucose.".into(),
                advisory: None,
                provenance: Provenance::Generated,
            }],
        );

        svc.log_exercise("u1", 7, 30, date()).expect("log generated");
        svc.log_exercise("u1", 1, 20, date()).expect("log static");

        let logged = svc.exercises_on("u1", date()).expect("list");
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].exercise.name, "Evening Walk");
        assert_eq!(logged[0].user_duration, 30);

        // Another user cannot resolve this generated id.
        let err = svc.log_exercise("u2", 7, 30, date()).expect_err("fail");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_log_exercise_requires_duration() {
        let (svc, _cache) = service();
        let err = svc.log_exercise("u1", 1, 0, date()).expect_err("fail");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_daily_summary_aggregates() {
        let (svc, _cache) = service();
        // id 1: 350 kcal / 45 carbs / low; id 2: 380 kcal / 48 carbs / medium
        svc.log_meal("u1", 1, date()).expect("log");
        svc.log_meal("u1", 2, date()).expect("log");
        svc.log_exercise("u1", 1, 30, date()).expect("log");
        svc.log_exercise("u1", 5, 15, date()).expect("log");

        let summary = svc.daily_summary("u1", date()).expect("summary");
        assert!((summary.total_calories - 730.0).abs() < f64::EPSILON);
        assert!((summary.total_carbs - 93.0).abs() < f64::EPSILON);
        // (1 + 2) / 2 = 1.5 -> low
        assert_eq!(summary.avg_glycemic_index, "low");
        assert_eq!(summary.total_exercise_minutes, 45);
        assert_eq!(
            summary.intensities,
            vec![Intensity::Low, Intensity::High]
        );
    }

    #[test]
    fn test_daily_summary_empty_day() {
        let (svc, _cache) = service();
        let summary = svc.daily_summary("u1", date()).expect("summary");
        assert!((summary.total_calories).abs() < f64::EPSILON);
        assert_eq!(summary.avg_glycemic_index, "none");
        assert!(summary.intensities.is_empty());
    }

    #[test]
    fn test_average_gi_label_boundaries() {
        use GlycemicIndex::{High, Low, Medium};
        assert_eq!(average_gi_label(&[]), "none");
        assert_eq!(average_gi_label(&[Low, Medium]), "low");
        assert_eq!(average_gi_label(&[Medium]), "medium");
        assert_eq!(average_gi_label(&[Medium, High]), "medium");
        assert_eq!(average_gi_label(&[High, High, Medium]), "high");
    }
}
